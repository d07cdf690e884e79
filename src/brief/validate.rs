use crate::error::ValidationError;
use chrono::NaiveDate;
use regex::Regex;

use super::types::{TripPlan, TripRequest, DEFAULT_ADULTS};

fn is_iso_date(s: &str) -> bool {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

/// Parse a strict YYYY-MM-DD calendar date
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    if !is_iso_date(s) {
        return Err(ValidationError::DateFormat);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::PastDate);
    }
    Ok(())
}

/// Normalize and check a three-letter location code given directly by a user
pub fn validate_location_code(
    code: &str,
    role: &'static str,
    example: &'static str,
) -> Result<String, ValidationError> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(ValidationError::LocationCode {
            role,
            code,
            example,
        })
    }
}

pub fn validate_adults(adults: i64) -> Result<u8, ValidationError> {
    match u8::try_from(adults) {
        Ok(n @ 1..=9) => Ok(n),
        _ => Err(ValidationError::Adults),
    }
}

impl TripRequest {
    /// Check the request shape. No network calls depend on anything that fails here.
    pub fn validate(&self) -> Result<TripPlan, ValidationError> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(ValidationError::MissingDestination);
        }

        let depart_date = parse_iso_date(&self.depart_date)?;
        let return_date = parse_iso_date(&self.return_date)?;
        if return_date <= depart_date {
            return Err(ValidationError::ReturnNotAfterDepart);
        }

        let adults = validate_adults(self.adults.unwrap_or(DEFAULT_ADULTS))?;

        Ok(TripPlan {
            destination: destination.to_string(),
            depart_date,
            return_date,
            nights: (return_date - depart_date).num_days(),
            adults,
            origin: self
                .origin
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_uppercase),
        })
    }
}
