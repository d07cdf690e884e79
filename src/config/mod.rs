mod defaults;
mod types;

pub use defaults::FALLBACK_ORIGIN;
pub use types::*;

use crate::error::ConfigError;
use crate::resolver::looks_like_code;
use defaults::*;
use std::path::Path;
use tracing::debug;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_origin: None,
            retry: RetryConfig::default(),
            on_timeout: TimeoutPolicy::default(),
            sections: SectionsConfig::default(),
            resolver: ResolverConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists; a missing file that was not asked for
    /// explicitly yields the defaults.
    pub fn load_or_default(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        if !explicit && !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply credential and base-URL overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(k))
                .find(|v| !v.trim().is_empty())
        };

        let amadeus = &mut self.providers.amadeus;
        if let Some(id) = first(&["AMADEUS_CLIENT_ID", "AMADEUS_API_KEY", "AMADEUS_KEY"]) {
            amadeus.client_id = Some(id);
        }
        if let Some(secret) = first(&[
            "AMADEUS_CLIENT_SECRET",
            "AMADEUS_API_SECRET",
            "AMADEUS_SECRET",
        ]) {
            amadeus.client_secret = Some(secret);
        }
        if let Some(url) = first(&["AMADEUS_BASE_URL"]) {
            amadeus.base_url = url;
        }
        if let Some(key) = first(&["OPENWEATHER_KEY"]) {
            self.providers.openweather.api_key = Some(key);
        }
        if let Some(key) = first(&["SERPAPI_KEY"]) {
            self.providers.serpapi.api_key = Some(key);
        }
        if let Some(key) = first(&["YELP_API_KEY"]) {
            self.providers.yelp.api_key = Some(key);
        }
        if let Some(origin) = first(&["DEFAULT_ORIGIN_IATA"]) {
            self.default_origin = Some(origin);
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budgets = [
            ("weather", &self.sections.weather),
            ("restaurants", &self.sections.restaurants),
            ("activities", &self.sections.activities),
            ("hotels", &self.sections.hotels),
            ("flights", &self.sections.flights),
        ];
        for (name, budget) in budgets {
            if budget.timeout_ms == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("resolver"));
        }
        if self.providers.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("providers"));
        }

        if let Some(origin) = &self.default_origin {
            if !looks_like_code(origin) {
                return Err(ConfigError::DefaultOrigin(origin.clone()));
            }
        }

        Ok(())
    }

    /// Explicit request value, else the configured default, else the fallback
    pub fn origin_for(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_origin.as_deref().map(str::trim))
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_ORIGIN)
            .to_uppercase()
    }
}
