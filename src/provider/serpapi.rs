use super::http::{fetch_json, require};
use super::{HotelQuery, HotelSource};
use crate::brief::{Answer, HotelList, HotelOption};
use crate::config::SerpApiConfig;
use crate::error::UpstreamError;
use async_trait::async_trait;
use serde::Deserialize;

const SERVICE: &str = "SerpApi";
const MAX_HOTELS: usize = 5;

#[derive(Debug, Deserialize)]
struct RatePerNight {
    #[serde(default)]
    extracted_lowest: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Property {
    name: String,
    #[serde(default)]
    extracted_hotel_class: Option<u8>,
    #[serde(default)]
    rate_per_night: Option<RatePerNight>,
}

#[derive(Debug, Deserialize)]
struct HotelsResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    properties: Vec<Property>,
}

/// Google Hotels search through SerpApi
pub struct SerpApiClient {
    http: reqwest::Client,
    config: SerpApiConfig,
}

impl SerpApiClient {
    pub fn new(http: reqwest::Client, config: SerpApiConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl HotelSource for SerpApiClient {
    async fn hotel_options(&self, query: &HotelQuery) -> Result<Answer<HotelList>, UpstreamError> {
        let api_key = require(&self.config.api_key, "SERPAPI_KEY")?;

        let request = self
            .http
            .get(format!("{}/search", self.config.base_url))
            .query(&[
                ("engine", "google_hotels".to_string()),
                ("q", format!("Hotels in {}", query.city_code)),
                ("check_in_date", query.check_in.to_string()),
                ("check_out_date", query.check_out.to_string()),
                ("adults", query.adults.to_string()),
                ("currency", self.config.currency.clone()),
                ("api_key", api_key),
            ]);

        let response: HotelsResponse = fetch_json(SERVICE, request).await?;
        if let Some(message) = response.error {
            return Err(UpstreamError::Rejected {
                service: SERVICE,
                message,
            });
        }

        if response.properties.is_empty() {
            return Ok(Answer::unavailable(format!(
                "No hotels found for {} on those dates.",
                query.city_code
            )));
        }

        let nights = query.nights() as f64;
        let hotels = response
            .properties
            .into_iter()
            .take(MAX_HOTELS)
            .map(|p| {
                let nightly = p
                    .rate_per_night
                    .and_then(|r| r.extracted_lowest)
                    .filter(|rate| *rate > 0.0);
                HotelOption {
                    name: p.name,
                    city: query.city_code.clone(),
                    stars: p.extracted_hotel_class.unwrap_or(0),
                    nightly_price: nightly,
                    total_price: nightly.map(|rate| rate * nights),
                    currency: self.config.currency.clone(),
                }
            })
            .collect();

        Ok(Answer::Available(HotelList { hotels }))
    }
}
