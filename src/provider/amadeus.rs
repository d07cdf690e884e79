use super::http::{fetch_json, require};
use super::{ActivitySource, FlightQuery, FlightSource, GeoPoint};
use crate::brief::{Activity, FlightOption};
use crate::config::AmadeusConfig;
use crate::error::UpstreamError;
use crate::resolver::{
    CodeKind, IssuedToken, LocationLookup, LocationMatch, TokenCache, TokenPolicy, TokenSource,
};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "Amadeus";
const ACTIVITY_RADIUS_KM: u32 = 20;
const MAX_ACTIVITIES: usize = 6;
/// Offers requested per leg before dedupe trims them down
const OFFERS_REQUESTED: usize = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    name: String,
    #[serde(rename = "iataCode", default)]
    iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataList<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    #[serde(default)]
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    departure: Endpoint,
    arrival: Endpoint,
    #[serde(default)]
    carrier_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    #[serde(default)]
    total: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOffer {
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    price: OfferPrice,
    #[serde(default)]
    validating_airline_codes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Dictionaries {
    #[serde(default)]
    carriers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
    #[serde(default)]
    dictionaries: Dictionaries,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityPrice {
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<ActivityPrice>,
    #[serde(default)]
    booking_link: Option<String>,
}

/// Amadeus self-service client: token exchange, location lookup, flight
/// offers and activities. One bearer token is shared by every call.
pub struct AmadeusClient {
    http: reqwest::Client,
    config: AmadeusConfig,
    tokens: TokenCache,
    page_limit: u32,
}

impl AmadeusClient {
    pub fn new(
        http: reqwest::Client,
        config: AmadeusConfig,
        policy: TokenPolicy,
        page_limit: u32,
    ) -> Self {
        Self {
            http,
            config,
            tokens: TokenCache::new(policy),
            page_limit,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let token = self.tokens.bearer(self).await?;
        let request = self
            .http
            .get(format!("{}{}", self.config.base_url, endpoint))
            .bearer_auth(token)
            .query(query);
        fetch_json(SERVICE, request).await
    }
}

#[async_trait]
impl TokenSource for AmadeusClient {
    async fn issue_token(&self) -> Result<IssuedToken, UpstreamError> {
        let client_id = require(&self.config.client_id, "AMADEUS_CLIENT_ID")?;
        let client_secret = require(&self.config.client_secret, "AMADEUS_CLIENT_SECRET")?;

        debug!("Requesting Amadeus access token");
        let request = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.config.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ]);

        let response: TokenResponse = fetch_json(SERVICE, request).await?;
        Ok(IssuedToken {
            access_token: response.access_token,
            expires_in: Duration::from_secs(response.expires_in),
        })
    }
}

#[async_trait]
impl LocationLookup for AmadeusClient {
    async fn search_locations(
        &self,
        keyword: &str,
        kind: CodeKind,
    ) -> Result<Vec<LocationMatch>, UpstreamError> {
        let response: DataList<Location> = self
            .get(
                "/v1/reference-data/locations",
                &[
                    ("keyword", keyword.to_string()),
                    ("subType", kind.sub_type().to_string()),
                    ("page[limit]", self.page_limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .data
            .into_iter()
            .map(|l| LocationMatch {
                name: l.name,
                iata_code: l.iata_code,
            })
            .collect())
    }
}

#[async_trait]
impl FlightSource for AmadeusClient {
    async fn one_way(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, UpstreamError> {
        let response: OffersResponse = self
            .get(
                "/v2/shopping/flight-offers",
                &[
                    ("originLocationCode", query.origin.clone()),
                    ("destinationLocationCode", query.destination.clone()),
                    ("departureDate", query.departure_date.to_string()),
                    ("adults", query.adults.to_string()),
                    ("nonStop", "false".to_string()),
                    ("max", OFFERS_REQUESTED.to_string()),
                ],
            )
            .await?;

        let carriers = &response.dictionaries.carriers;
        let options = response
            .data
            .iter()
            .filter_map(|offer| flight_option(offer, carriers));

        let flights = dedupe_flights(options, self.config.max_flight_options);
        debug!(
            "{} -> {} on {}: {} option(s)",
            query.origin,
            query.destination,
            query.departure_date,
            flights.len()
        );
        Ok(flights)
    }
}

#[async_trait]
impl ActivitySource for AmadeusClient {
    async fn activities_near(&self, point: &GeoPoint) -> Result<Vec<Activity>, UpstreamError> {
        let response: DataList<RawActivity> = self
            .get(
                "/v1/shopping/activities",
                &[
                    ("latitude", point.lat.to_string()),
                    ("longitude", point.lon.to_string()),
                    ("radius", ACTIVITY_RADIUS_KM.to_string()),
                ],
            )
            .await?;

        Ok(response
            .data
            .into_iter()
            .filter_map(|raw| {
                let name = raw.name.filter(|n| !n.trim().is_empty())?;
                let description = raw
                    .short_description
                    .or(raw.description)
                    .map(|d| strip_markup(&d))
                    .filter(|d| !d.is_empty());
                let price = raw.price.and_then(|p| match (p.amount, p.currency_code) {
                    (Some(amount), Some(currency)) => Some(format!("{} {}", amount, currency)),
                    (Some(amount), None) => Some(amount),
                    _ => None,
                });
                Some(Activity {
                    name,
                    description,
                    price,
                    booking_link: raw.booking_link,
                })
            })
            .take(MAX_ACTIVITIES)
            .collect())
    }
}

/// Only the first itinerary is considered: a one-way search returns one.
fn flight_option(offer: &FlightOffer, carriers: &HashMap<String, String>) -> Option<FlightOption> {
    let segments = &offer.itineraries.first()?.segments;
    let first = segments.first()?;
    let last = segments.last()?;

    let code = first
        .carrier_code
        .clone()
        .or_else(|| offer.validating_airline_codes.first().cloned())
        .unwrap_or_else(|| "Unknown".to_string());
    let airline = carriers.get(&code).cloned().unwrap_or(code);

    let price = match (&offer.price.total, &offer.price.currency) {
        (Some(total), Some(currency)) => format!("{} {}", total, currency),
        (Some(total), None) => total.clone(),
        _ => "N/A".to_string(),
    };

    Some(FlightOption {
        airline,
        price,
        depart_time: first.departure.at.clone().unwrap_or_else(|| "N/A".into()),
        arrive_time: last.arrival.at.clone().unwrap_or_else(|| "N/A".into()),
        stops: segments.len().saturating_sub(1) as u32,
    })
}

/// Drop offers identical on airline, price, times and stops, keeping order
fn dedupe_flights(options: impl Iterator<Item = FlightOption>, limit: usize) -> Vec<FlightOption> {
    let mut seen = HashSet::new();
    options
        .filter(|f| {
            seen.insert((
                f.airline.clone(),
                f.price.clone(),
                f.depart_time.clone(),
                f.arrive_time.clone(),
                f.stops,
            ))
        })
        .take(limit)
        .collect()
}

fn strip_markup(text: &str) -> String {
    let stripped = match Regex::new(r"<[^>]*>") {
        Ok(tags) => tags.replace_all(text, " ").into_owned(),
        Err(_) => text.to_string(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
