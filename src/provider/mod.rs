mod amadeus;
mod http;
mod openweather;
mod serpapi;
mod yelp;

#[cfg(test)]
pub(crate) mod fake;

pub use amadeus::AmadeusClient;
pub use openweather::OpenWeatherClient;
pub use serpapi::SerpApiClient;
pub use yelp::YelpClient;

use crate::brief::{Activity, Answer, FlightOption, HotelList, RestaurantList, WeatherReport};
use crate::config::Config;
use crate::error::UpstreamError;
use crate::resolver::{LocationLookup, TokenPolicy};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelQuery {
    pub city_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
}

impl HotelQuery {
    /// Nights billed for the stay, never fewer than one
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u8,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions plus a short daily outlook for a free-text place
    async fn weather(&self, place: &str) -> Result<Answer<WeatherReport>, UpstreamError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<GeoPoint>, UpstreamError>;
}

#[async_trait]
pub trait RestaurantSource: Send + Sync {
    async fn top_restaurants(&self, location: &str)
        -> Result<Answer<RestaurantList>, UpstreamError>;
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn activities_near(&self, point: &GeoPoint) -> Result<Vec<Activity>, UpstreamError>;
}

#[async_trait]
pub trait HotelSource: Send + Sync {
    async fn hotel_options(&self, query: &HotelQuery) -> Result<Answer<HotelList>, UpstreamError>;
}

#[async_trait]
pub trait FlightSource: Send + Sync {
    /// One-way offers; an empty list means the route has nothing on that date
    async fn one_way(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, UpstreamError>;
}

/// Every upstream collaborator the brief depends on
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub restaurants: Arc<dyn RestaurantSource>,
    pub activities: Arc<dyn ActivitySource>,
    pub hotels: Arc<dyn HotelSource>,
    pub flights: Arc<dyn FlightSource>,
    pub locations: Arc<dyn LocationLookup>,
}

/// Build the HTTP-backed providers from configuration
pub fn create_providers(config: &Config) -> Result<Providers, UpstreamError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.providers.request_timeout_ms))
        .build()
        .map_err(|source| UpstreamError::Network {
            service: "http client",
            source,
        })?;

    let openweather = Arc::new(OpenWeatherClient::new(
        client.clone(),
        config.providers.openweather.clone(),
    ));
    let amadeus = Arc::new(AmadeusClient::new(
        client.clone(),
        config.providers.amadeus.clone(),
        TokenPolicy::from(&config.resolver),
        config.resolver.page_limit,
    ));
    let serpapi = Arc::new(SerpApiClient::new(
        client.clone(),
        config.providers.serpapi.clone(),
    ));
    let yelp = Arc::new(YelpClient::new(client, config.providers.yelp.clone()));

    Ok(Providers {
        weather: openweather.clone(),
        geocoder: openweather,
        restaurants: yelp,
        activities: amadeus.clone(),
        hotels: serpapi,
        flights: amadeus.clone(),
        locations: amadeus,
    })
}
