use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Coarse failure category carried by every failed section and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Resolution,
    Upstream,
    Timeout,
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Resolution => write!(f, "resolution"),
            ErrorKind::Upstream => write!(f, "upstream"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("'{0}' needs a timeout_ms greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Invalid default origin '{0}'. Use a 3-letter IATA code like SEA.")]
    DefaultOrigin(String),
}

/// Rejected request shape. Raised before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Destination is required. Try something like \"Paris, FR\" or \"Seattle, WA\".")]
    MissingDestination,

    #[error("Dates must be in YYYY-MM-DD format (example: 2026-03-10).")]
    DateFormat,

    #[error("Invalid date '{0}'. Use a real calendar date in YYYY-MM-DD format (example: 2026-03-10).")]
    InvalidDate(String),

    #[error("Return date must be after depart date.")]
    ReturnNotAfterDepart,

    #[error("That date is in the past. Please choose today or a future date.")]
    PastDate,

    #[error("Adults must be an integer between 1 and 9.")]
    Adults,

    #[error("Invalid {role} code '{code}'. Please use a 3-letter IATA code like {example}.")]
    LocationCode {
        role: &'static str,
        code: String,
        example: &'static str,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Failure talking to (or configuring) one upstream collaborator.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP {status} calling {service}. {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Network error calling {service}: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed {service} payload: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },

    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    #[error("{label} timed out after {}ms", .after.as_millis())]
    Timeout { label: String, after: Duration },

    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("{0} task panicked")]
    Panicked(String),
}

impl UpstreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpstreamError::Http { .. }
            | UpstreamError::Network { .. }
            | UpstreamError::Malformed { .. }
            | UpstreamError::Rejected { .. }
            | UpstreamError::Panicked(_) => ErrorKind::Upstream,
            UpstreamError::Timeout { .. } => ErrorKind::Timeout,
            UpstreamError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Missing credentials will not appear between attempts.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, UpstreamError::Configuration(_))
    }

    pub fn malformed(service: &'static str, reason: impl std::fmt::Display) -> Self {
        UpstreamError::Malformed {
            service,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_kinds() {
        let timeout = UpstreamError::Timeout {
            label: "weather".to_string(),
            after: Duration::from_millis(10_000),
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert_eq!(timeout.to_string(), "weather timed out after 10000ms");
        assert!(timeout.is_retryable());

        let missing = UpstreamError::Configuration("OPENWEATHER_KEY is not set".to_string());
        assert_eq!(missing.kind(), ErrorKind::Configuration);
        assert!(!missing.is_retryable());

        let http = UpstreamError::Http {
            service: "SerpApi",
            status: 503,
            body: String::new(),
        };
        assert_eq!(http.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_validation_messages_carry_hints() {
        assert!(ValidationError::DateFormat.to_string().contains("2026-03-10"));
        let code = ValidationError::LocationCode {
            role: "origin",
            code: "SEAT".to_string(),
            example: "SEA",
        };
        assert!(code.to_string().contains("like SEA"));
    }
}
