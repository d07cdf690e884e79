mod types;
mod validate;

pub use types::*;
pub use validate::{ensure_not_past, parse_iso_date, validate_adults, validate_location_code};
