use super::http::{fetch_json, require};
use super::RestaurantSource;
use crate::brief::{Answer, Restaurant, RestaurantList};
use crate::config::YelpConfig;
use crate::error::UpstreamError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

const SERVICE: &str = "Yelp";

#[derive(Debug, Deserialize)]
struct Category {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct YelpLocation {
    #[serde(default)]
    display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Business {
    name: String,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    location: YelpLocation,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

pub struct YelpClient {
    http: reqwest::Client,
    config: YelpConfig,
}

impl YelpClient {
    pub fn new(http: reqwest::Client, config: YelpConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl RestaurantSource for YelpClient {
    async fn top_restaurants(
        &self,
        location: &str,
    ) -> Result<Answer<RestaurantList>, UpstreamError> {
        let api_key = require(&self.config.api_key, "YELP_API_KEY")?;

        let request = self
            .http
            .get(format!("{}/v3/businesses/search", self.config.base_url))
            .bearer_auth(api_key)
            .query(&[
                ("location", location.to_string()),
                ("categories", "restaurants".to_string()),
                ("sort_by", "rating".to_string()),
                ("limit", self.config.limit.to_string()),
            ]);

        let response: SearchResponse = match fetch_json(SERVICE, request).await {
            Ok(response) => response,
            // Yelp answers an unknown place with 400 LOCATION_NOT_FOUND
            Err(UpstreamError::Http { status, body, .. })
                if status == StatusCode::BAD_REQUEST.as_u16()
                    && body.contains("LOCATION_NOT_FOUND") =>
            {
                return Ok(Answer::unresolved(format!(
                    "Couldn't find restaurants for \"{}\". Try \"City, Country\".",
                    location
                )));
            }
            Err(e) => return Err(e),
        };

        if response.businesses.is_empty() {
            return Ok(Answer::unavailable(format!(
                "No restaurants found near {}.",
                location
            )));
        }

        let restaurants = response
            .businesses
            .into_iter()
            .map(|b| Restaurant {
                name: b.name,
                category: b
                    .categories
                    .into_iter()
                    .map(|c| c.title)
                    .collect::<Vec<_>>()
                    .join(", "),
                address: b.location.display_address.join(", "),
                url: b.url,
                rating: b.rating,
            })
            .collect();

        Ok(Answer::Available(RestaurantList { restaurants }))
    }
}
