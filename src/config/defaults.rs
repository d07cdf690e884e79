use super::types::SectionBudget;

pub const FALLBACK_ORIGIN: &str = "SEA";

pub fn default_version() -> u32 {
    1
}

pub fn default_base_delay_ms() -> u64 {
    400
}

pub fn default_max_delay_ms() -> u64 {
    2500
}

pub fn default_weather_budget() -> SectionBudget {
    SectionBudget::new(10_000, 1)
}

pub fn default_restaurants_budget() -> SectionBudget {
    SectionBudget::new(12_000, 1)
}

pub fn default_activities_budget() -> SectionBudget {
    SectionBudget::new(12_000, 1)
}

pub fn default_hotels_budget() -> SectionBudget {
    SectionBudget::new(14_000, 2)
}

pub fn default_flights_budget() -> SectionBudget {
    SectionBudget::new(16_000, 1)
}

pub fn default_token_refresh_margin_sec() -> u64 {
    30
}

pub fn default_token_min_lifetime_sec() -> u64 {
    60
}

pub fn default_page_limit() -> u32 {
    10
}

pub fn default_resolve_timeout_ms() -> u64 {
    8_000
}

pub fn default_request_timeout_ms() -> u64 {
    20_000
}

pub fn default_amadeus_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

pub fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

pub fn default_units() -> String {
    "imperial".to_string()
}

pub fn default_forecast_days() -> usize {
    3
}

pub fn default_serpapi_base_url() -> String {
    "https://serpapi.com".to_string()
}

pub fn default_currency() -> String {
    "USD".to_string()
}

pub fn default_yelp_base_url() -> String {
    "https://api.yelp.com".to_string()
}

pub fn default_restaurant_limit() -> u32 {
    7
}

pub fn default_max_flight_options() -> usize {
    5
}
