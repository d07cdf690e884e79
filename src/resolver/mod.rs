mod cache;
mod keywords;
mod token;

pub use cache::CodeCache;
pub use keywords::{keyword_attempts, looks_like_code, normalize_place};
pub use token::{IssuedToken, TokenCache, TokenPolicy, TokenSource};

use crate::error::UpstreamError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which location scope a free-text place is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    City,
    Airport,
}

impl CodeKind {
    /// Value of the lookup service's `subType` parameter
    pub fn sub_type(&self) -> &'static str {
        match self {
            CodeKind::City => "CITY",
            CodeKind::Airport => "AIRPORT",
        }
    }
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeKind::City => write!(f, "city"),
            CodeKind::Airport => write!(f, "airport"),
        }
    }
}

/// One candidate returned by the remote place lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationMatch {
    pub name: String,
    pub iata_code: Option<String>,
}

#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn search_locations(
        &self,
        keyword: &str,
        kind: CodeKind,
    ) -> Result<Vec<LocationMatch>, UpstreamError>;
}

/// Result of walking the keyword attempts for one scope
struct Search {
    code: Option<String>,
    /// No attempt failed, so a miss is a real "no match"
    definitive: bool,
}

/// Resolves free-text place names to three-letter location codes
pub struct CodeResolver {
    lookup: Arc<dyn LocationLookup>,
    cache: CodeCache,
}

impl CodeResolver {
    pub fn new(lookup: Arc<dyn LocationLookup>) -> Self {
        Self {
            lookup,
            cache: CodeCache::new(),
        }
    }

    pub async fn resolve(&self, kind: CodeKind, place: &str) -> Option<String> {
        let place = place.trim();
        if place.is_empty() {
            return None;
        }
        if looks_like_code(place) {
            return Some(place.to_uppercase());
        }

        let key = normalize_place(place).to_lowercase();
        if let Some(cached) = self.cache.get(kind, &key) {
            debug!("Resolved {} '{}' from cache: {:?}", kind, place, cached);
            return cached;
        }

        let search = match kind {
            CodeKind::City => self.search(CodeKind::City, place).await,
            CodeKind::Airport => {
                let airport = self.search(CodeKind::Airport, place).await;
                if airport.code.is_some() {
                    airport
                } else {
                    // A city code is usually accepted by flight search too
                    let city = self.search(CodeKind::City, place).await;
                    Search {
                        code: city.code,
                        definitive: airport.definitive && city.definitive,
                    }
                }
            }
        };

        if search.code.is_some() || search.definitive {
            self.cache.insert(kind, &key, search.code.clone());
        } else {
            debug!("Not caching unresolved {} '{}' after upstream failures", kind, place);
        }

        search.code
    }

    async fn search(&self, kind: CodeKind, place: &str) -> Search {
        let mut definitive = true;

        for keyword in keyword_attempts(place) {
            debug!("Looking up {} code for keyword '{}'", kind, keyword);
            match self.lookup.search_locations(&keyword, kind).await {
                Ok(matches) => {
                    if let Some((name, code)) = first_code(&matches) {
                        debug!("Keyword '{}' matched {} ({})", keyword, name, code);
                        return Search {
                            code: Some(code),
                            definitive: true,
                        };
                    }
                }
                Err(e @ UpstreamError::Configuration(_)) => {
                    warn!("Location lookup unavailable: {}", e);
                    return Search {
                        code: None,
                        definitive: false,
                    };
                }
                Err(e) => {
                    warn!("Location lookup for '{}' failed: {}", keyword, e);
                    definitive = false;
                }
            }
        }

        Search {
            code: None,
            definitive,
        }
    }
}

fn first_code(matches: &[LocationMatch]) -> Option<(&str, String)> {
    matches.iter().find_map(|m| {
        m.iata_code
            .as_deref()
            .filter(|code| looks_like_code(code))
            .map(|code| (m.name.as_str(), code.trim().to_uppercase()))
    })
}
