/// True for a bare three-letter alphabetic code such as "sea" or "PAR"
pub fn looks_like_code(s: &str) -> bool {
    let s = s.trim();
    s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Trim, collapse whitespace runs, then drop anything but word characters,
/// spaces, commas, periods and hyphens.
pub fn normalize_place(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|&c| c.is_alphanumeric() || c == '_' || c == ' ' || ",.-".contains(c))
        .collect()
}

/// Ordered, de-duplicated keywords to try against the location lookup.
///
/// "Seattle, WA" -> ["Seattle, WA", "Seattle"]
/// "Dallas TX"   -> ["Dallas TX", "Dallas"]
pub fn keyword_attempts(place: &str) -> Vec<String> {
    let full = normalize_place(place);
    let before_comma = full.split(',').next().unwrap_or_default().trim().to_string();

    let mut candidates = vec![full.clone(), before_comma.clone()];

    // Trailing state/country abbreviation
    let tokens: Vec<&str> = before_comma.split(' ').collect();
    if let [head @ .., last] = tokens.as_slice() {
        if !head.is_empty() && last.len() == 2 && last.chars().all(|c| c.is_ascii_alphabetic()) {
            candidates.push(head.join(" "));
        }
    }

    candidates.push(tokens.first().copied().unwrap_or_default().to_string());

    let mut attempts: Vec<String> = Vec::new();
    for candidate in candidates {
        if !candidate.is_empty() && !attempts.contains(&candidate) {
            attempts.push(candidate);
        }
    }
    attempts
}
