use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Origin airport used when a request does not name one
    #[serde(default)]
    pub default_origin: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub on_timeout: TimeoutPolicy,

    #[serde(default)]
    pub sections: SectionsConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// What happens to an attempt whose timer fired first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Leave the call running in the background and discard its result
    #[default]
    Detach,
    /// Abort the call's task
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SectionBudget {
    pub timeout_ms: u64,
    pub retries: u32,
}

/// A section budget as written in the file; unset fields keep the
/// section's own default.
#[derive(Debug, Default, Deserialize)]
struct BudgetOverride {
    timeout_ms: Option<u64>,
    retries: Option<u32>,
}

impl BudgetOverride {
    fn over(self, base: SectionBudget) -> SectionBudget {
        SectionBudget {
            timeout_ms: self.timeout_ms.unwrap_or(base.timeout_ms),
            retries: self.retries.unwrap_or(base.retries),
        }
    }
}

impl SectionBudget {
    pub const fn new(timeout_ms: u64, retries: u32) -> Self {
        Self {
            timeout_ms,
            retries,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SectionsConfig {
    #[serde(default = "default_weather_budget")]
    pub weather: SectionBudget,

    #[serde(default = "default_restaurants_budget")]
    pub restaurants: SectionBudget,

    #[serde(default = "default_activities_budget")]
    pub activities: SectionBudget,

    #[serde(default = "default_hotels_budget")]
    pub hotels: SectionBudget,

    #[serde(default = "default_flights_budget")]
    pub flights: SectionBudget,
}

impl<'de> Deserialize<'de> for SectionsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Overrides {
            #[serde(default)]
            weather: BudgetOverride,
            #[serde(default)]
            restaurants: BudgetOverride,
            #[serde(default)]
            activities: BudgetOverride,
            #[serde(default)]
            hotels: BudgetOverride,
            #[serde(default)]
            flights: BudgetOverride,
        }

        let o = Overrides::deserialize(deserializer)?;
        Ok(Self {
            weather: o.weather.over(default_weather_budget()),
            restaurants: o.restaurants.over(default_restaurants_budget()),
            activities: o.activities.over(default_activities_budget()),
            hotels: o.hotels.over(default_hotels_budget()),
            flights: o.flights.over(default_flights_budget()),
        })
    }
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            weather: default_weather_budget(),
            restaurants: default_restaurants_budget(),
            activities: default_activities_budget(),
            hotels: default_hotels_budget(),
            flights: default_flights_budget(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ResolverConfig {
    /// A cached token is reused while more than this many seconds remain
    #[serde(default = "default_token_refresh_margin_sec")]
    pub token_refresh_margin_sec: u64,

    /// Lower bound applied to the token lifetime reported by the server
    #[serde(default = "default_token_min_lifetime_sec")]
    pub token_min_lifetime_sec: u64,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Upper bound on resolving one code before the sections start;
    /// an unresolved code is treated as absent
    #[serde(default = "default_resolve_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            token_refresh_margin_sec: default_token_refresh_margin_sec(),
            token_min_lifetime_sec: default_token_min_lifetime_sec(),
            page_limit: default_page_limit(),
            timeout_ms: default_resolve_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    /// Whole-request timeout applied by the shared HTTP client
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub amadeus: AmadeusConfig,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub serpapi: SerpApiConfig,

    #[serde(default)]
    pub yelp: YelpConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            amadeus: AmadeusConfig::default(),
            openweather: OpenWeatherConfig::default(),
            serpapi: SerpApiConfig::default(),
            yelp: YelpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AmadeusConfig {
    #[serde(default = "default_amadeus_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_max_flight_options")]
    pub max_flight_options: usize,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: default_amadeus_base_url(),
            client_id: None,
            client_secret: None,
            max_flight_options: default_max_flight_options(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OpenWeatherConfig {
    #[serde(default = "default_openweather_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_openweather_base_url(),
            api_key: None,
            units: default_units(),
            forecast_days: default_forecast_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SerpApiConfig {
    #[serde(default = "default_serpapi_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_serpapi_base_url(),
            api_key: None,
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct YelpConfig {
    #[serde(default = "default_yelp_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_restaurant_limit")]
    pub limit: u32,
}

impl Default for YelpConfig {
    fn default() -> Self {
        Self {
            base_url: default_yelp_base_url(),
            api_key: None,
            limit: default_restaurant_limit(),
        }
    }
}
