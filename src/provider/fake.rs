//! In-memory upstream for exercising sections and the orchestrator

use super::*;
use crate::brief::{CurrentConditions, HotelOption, Restaurant, SectionKind};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) struct FakeUpstream {
    pub(crate) geo: Option<GeoPoint>,
    pub(crate) activities: Vec<Activity>,
    /// Offers keyed by "ORIGIN-DEST"; unknown routes have none
    pub(crate) routes: HashMap<String, Vec<FlightOption>>,
    pub(crate) failing: HashSet<SectionKind>,
    pub(crate) delays: HashMap<SectionKind, Duration>,
    pub(crate) calls: Mutex<Vec<&'static str>>,
    pub(crate) flight_calls: Mutex<Vec<(String, String, String)>>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        let mut routes = HashMap::new();
        routes.insert(
            "SEA-LIS".to_string(),
            vec![FlightOption {
                airline: "TAP AIR PORTUGAL".to_string(),
                price: "702.10 USD".to_string(),
                depart_time: "2026-03-10T13:05:00".to_string(),
                arrive_time: "2026-03-11T09:40:00".to_string(),
                stops: 1,
            }],
        );

        Self {
            geo: Some(GeoPoint {
                name: "Lisbon, PT".to_string(),
                lat: 38.72,
                lon: -9.14,
            }),
            activities: Vec::new(),
            routes,
            failing: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            flight_calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeUpstream {
    pub(crate) fn failing(mut self, kind: SectionKind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub(crate) fn slow(mut self, kind: SectionKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    pub(crate) fn calls_to(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == name)
            .count()
    }

    /// (origin, destination, date) of every flight query, sorted
    pub(crate) fn flight_routes(&self) -> Vec<(String, String, String)> {
        let mut routes = self.flight_calls.lock().unwrap().clone();
        routes.sort();
        routes
    }

    pub(crate) fn providers(self: &Arc<Self>, locations: Arc<dyn LocationLookup>) -> Providers {
        Providers {
            weather: self.clone(),
            geocoder: self.clone(),
            restaurants: self.clone(),
            activities: self.clone(),
            hotels: self.clone(),
            flights: self.clone(),
            locations,
        }
    }

    async fn enter(&self, kind: SectionKind, name: &'static str) -> Result<(), UpstreamError> {
        self.calls.lock().unwrap().push(name);
        if let Some(delay) = self.delays.get(&kind) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&kind) {
            return Err(UpstreamError::Http {
                service: "fake",
                status: 503,
                body: format!("{} unavailable", name),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherSource for FakeUpstream {
    async fn weather(&self, place: &str) -> Result<Answer<WeatherReport>, UpstreamError> {
        self.enter(SectionKind::Weather, "weather").await?;
        Ok(Answer::Available(WeatherReport {
            location: place.to_string(),
            current: CurrentConditions {
                temp: Some(61.0),
                feels_like: Some(60.0),
                humidity: Some(70.0),
                wind_speed: Some(8.0),
                description: "few clouds".to_string(),
            },
            next_days: Vec::new(),
        }))
    }
}

#[async_trait]
impl Geocoder for FakeUpstream {
    async fn geocode(&self, _place: &str) -> Result<Option<GeoPoint>, UpstreamError> {
        self.calls.lock().unwrap().push("geocode");
        Ok(self.geo.clone())
    }
}

#[async_trait]
impl RestaurantSource for FakeUpstream {
    async fn top_restaurants(
        &self,
        location: &str,
    ) -> Result<Answer<RestaurantList>, UpstreamError> {
        self.enter(SectionKind::Restaurants, "restaurants").await?;
        Ok(Answer::Available(RestaurantList {
            restaurants: vec![Restaurant {
                name: format!("Tasca near {}", location),
                category: "Portuguese".to_string(),
                address: "Rua Augusta 1".to_string(),
                url: None,
                rating: Some(4.5),
            }],
        }))
    }
}

#[async_trait]
impl ActivitySource for FakeUpstream {
    async fn activities_near(&self, _point: &GeoPoint) -> Result<Vec<Activity>, UpstreamError> {
        self.enter(SectionKind::Activities, "activities").await?;
        Ok(self.activities.clone())
    }
}

#[async_trait]
impl HotelSource for FakeUpstream {
    async fn hotel_options(&self, query: &HotelQuery) -> Result<Answer<HotelList>, UpstreamError> {
        self.enter(SectionKind::Hotels, "hotels").await?;
        Ok(Answer::Available(HotelList {
            hotels: vec![HotelOption {
                name: "Hotel Avenida".to_string(),
                city: query.city_code.clone(),
                stars: 4,
                nightly_price: Some(150.0),
                total_price: Some(150.0 * query.nights() as f64),
                currency: "USD".to_string(),
            }],
        }))
    }
}

#[async_trait]
impl FlightSource for FakeUpstream {
    async fn one_way(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, UpstreamError> {
        self.flight_calls.lock().unwrap().push((
            query.origin.clone(),
            query.destination.clone(),
            query.departure_date.to_string(),
        ));
        self.enter(SectionKind::Flights, "flights").await?;
        Ok(self
            .routes
            .get(&format!("{}-{}", query.origin, query.destination))
            .cloned()
            .unwrap_or_default())
    }
}
