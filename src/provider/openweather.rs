use super::http::{fetch_json, require};
use super::{GeoPoint, Geocoder, WeatherSource};
use crate::brief::{Answer, CurrentConditions, WeatherReport};
use crate::config::OpenWeatherConfig;
use crate::error::UpstreamError;
use crate::forecast::{summarize, ForecastSample};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SERVICE: &str = "OpenWeather";

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

impl GeoResult {
    fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    fn check(self) -> Result<Self, UpstreamError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(UpstreamError::malformed(
                SERVICE,
                format!("coordinates out of range for {}", self.name),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct MainBlock {
    #[serde(default)]
    temp: Option<f64>,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    weather: Vec<Condition>,
    /// Seconds east of UTC
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
}

impl From<ForecastItem> for ForecastSample {
    fn from(item: ForecastItem) -> Self {
        ForecastSample {
            timestamp: item.dt,
            temp_min: item.main.temp_min,
            temp_max: item.main.temp_max,
            temp: item.main.temp,
            description: item.weather.into_iter().next().and_then(|c| c.description),
            precip_probability: item.pop,
        }
    }
}

pub struct OpenWeatherClient {
    http: reqwest::Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(http: reqwest::Client, config: OpenWeatherConfig) -> Self {
        Self { http, config }
    }

    fn api_key(&self) -> Result<String, UpstreamError> {
        require(&self.config.api_key, "OPENWEATHER_KEY")
    }

    async fn direct_geocode(
        &self,
        place: &str,
        limit: u32,
    ) -> Result<Vec<GeoResult>, UpstreamError> {
        let key = self.api_key()?;
        let limit = limit.to_string();
        let url = format!("{}/geo/1.0/direct", self.config.base_url);
        let request = self.http.get(url).query(&[
            ("q", place),
            ("limit", limit.as_str()),
            ("appid", key.as_str()),
        ]);

        let results: Vec<GeoResult> = fetch_json(SERVICE, request).await?;
        results.into_iter().map(GeoResult::check).collect()
    }

    async fn at_point<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        loc: &GeoResult,
    ) -> Result<T, UpstreamError> {
        let key = self.api_key()?;
        let url = format!("{}/data/2.5/{}", self.config.base_url, endpoint);
        let request = self.http.get(url).query(&[
            ("lat", loc.lat.to_string()),
            ("lon", loc.lon.to_string()),
            ("units", self.config.units.clone()),
            ("appid", key),
        ]);
        fetch_json(SERVICE, request).await
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn weather(&self, place: &str) -> Result<Answer<WeatherReport>, UpstreamError> {
        // Limit 3 so an ambiguous name can be reported back
        let mut matches = self.direct_geocode(place, 3).await?;

        if matches.is_empty() {
            return Ok(Answer::unresolved(format!(
                "Couldn't find \"{}\". Try something like \"Seattle, WA\" or \"Paris, FR\".",
                place
            )));
        }
        if matches.len() > 1 {
            let options = matches
                .iter()
                .enumerate()
                .map(|(i, g)| format!("{}. {}", i + 1, g.display_name()))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(Answer::unresolved(format!(
                "I found multiple matches for \"{}\":\n{}\n\nTry being more specific (add state/country).",
                place, options
            )));
        }

        let loc = matches.remove(0);
        let (current, forecast): (CurrentResponse, ForecastResponse) =
            tokio::try_join!(self.at_point("weather", &loc), self.at_point("forecast", &loc))?;

        debug!(
            "{} forecast: {} samples at offset {}s",
            loc.name,
            forecast.list.len(),
            current.timezone
        );

        let samples: Vec<ForecastSample> = forecast.list.into_iter().map(Into::into).collect();
        let next_days = summarize(&samples, current.timezone, self.config.forecast_days);

        Ok(Answer::Available(WeatherReport {
            location: loc.display_name(),
            current: CurrentConditions {
                temp: current.main.temp,
                feels_like: current.main.feels_like,
                humidity: current.main.humidity,
                wind_speed: current.wind.speed,
                description: current
                    .weather
                    .into_iter()
                    .next()
                    .and_then(|c| c.description)
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            next_days,
        }))
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn geocode(&self, place: &str) -> Result<Option<GeoPoint>, UpstreamError> {
        let first = self.direct_geocode(place, 1).await?.into_iter().next();
        Ok(first.map(|g| GeoPoint {
            name: g.display_name(),
            lat: g.lat,
            lon: g.lon,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new(
            reqwest::Client::new(),
            OpenWeatherConfig {
                base_url: server.uri(),
                api_key: Some("test-key".to_string()),
                ..OpenWeatherConfig::default()
            },
        )
    }

    async fn mount_geo(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_weather_report() {
        let server = MockServer::start().await;
        mount_geo(
            &server,
            json!([{"name": "Paris", "country": "FR", "lat": 48.85, "lon": 2.35}]),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 54.2, "feels_like": 52.0, "humidity": 71},
                "wind": {"speed": 6.5},
                "weather": [{"description": "broken clouds"}],
                "timezone": 3600
            })))
            .mount(&server)
            .await;

        // Two samples a day after tomorrow so the outlook is never "today"
        let base = (Utc::now() + chrono::Duration::days(2)).timestamp();
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {"dt": base, "main": {"temp_min": 45.0, "temp_max": 50.0},
                     "weather": [{"description": "light rain"}], "pop": 0.4},
                    {"dt": base + 60, "main": {"temp": 47.0},
                     "weather": [{"description": "light rain"}]}
                ]
            })))
            .mount(&server)
            .await;

        let answer = client(&server).weather("Paris, FR").await.unwrap();
        let report = answer.data().expect("report");
        assert_eq!(report.location, "Paris, FR");
        assert_eq!(report.current.description, "broken clouds");
        assert_eq!(report.current.humidity, Some(71.0));
        assert_eq!(report.next_days.len(), 1);
        assert_eq!(report.next_days[0].min, 45.0);
        assert_eq!(report.next_days[0].precip_probability, 0.4);
    }

    #[tokio::test]
    async fn test_unknown_place_is_inner_failure() {
        let server = MockServer::start().await;
        mount_geo(&server, json!([])).await;

        let answer = client(&server).weather("Atlantis").await.unwrap();
        assert!(!answer.is_available());
        assert!(answer.message().unwrap().contains("Paris, FR"));
    }

    #[tokio::test]
    async fn test_ambiguous_place_lists_matches() {
        let server = MockServer::start().await;
        mount_geo(
            &server,
            json!([
                {"name": "Portland", "state": "Oregon", "country": "US", "lat": 45.5, "lon": -122.6},
                {"name": "Portland", "state": "Maine", "country": "US", "lat": 43.6, "lon": -70.2}
            ]),
        )
        .await;

        let answer = client(&server).weather("Portland").await.unwrap();
        let message = answer.message().unwrap();
        assert!(message.contains("1. Portland, Oregon, US"));
        assert!(message.contains("2. Portland, Maine, US"));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_are_malformed() {
        let server = MockServer::start().await;
        mount_geo(
            &server,
            json!([{"name": "Nowhere", "country": "XX", "lat": 123.0, "lon": 2.0}]),
        )
        .await;

        let err = client(&server).geocode("Nowhere").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let owm = OpenWeatherClient::new(reqwest::Client::new(), OpenWeatherConfig::default());
        let err = owm.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Configuration(_)));
    }
}
