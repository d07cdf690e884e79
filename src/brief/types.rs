use crate::error::ErrorKind;
use crate::forecast::DaySummary;
use crate::runner::SectionOutcome;
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const DEFAULT_ADULTS: i64 = 1;

/// Raw trip request as received from the caller
#[derive(Debug, Clone, Default)]
pub struct TripRequest {
    pub destination: String,
    /// YYYY-MM-DD
    pub depart_date: String,
    /// YYYY-MM-DD
    pub return_date: String,
    pub adults: Option<i64>,
    pub origin: Option<String>,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPlan {
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub nights: i64,
    pub adults: u8,
    pub origin: Option<String>,
}

/// Codes resolved once per request and shared read-only by every section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedCodes {
    pub city_code: Option<String>,
    pub origin_code: Option<String>,
    pub dest_airport_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Weather,
    Restaurants,
    Activities,
    Hotels,
    Flights,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Weather,
        SectionKind::Restaurants,
        SectionKind::Activities,
        SectionKind::Hotels,
        SectionKind::Flights,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Weather => "weather",
            SectionKind::Restaurants => "restaurants",
            SectionKind::Activities => "activities",
            SectionKind::Hotels => "hotels",
            SectionKind::Flights => "flights",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inner, business-level answer of a section that did complete: either data,
/// or a definite "nothing available" with a hint for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer<T> {
    Available(T),
    Unavailable {
        message: String,
        reason: Option<ErrorKind>,
    },
}

impl<T> Answer<T> {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Answer::Unavailable {
            message: message.into(),
            reason: None,
        }
    }

    pub fn unresolved(message: impl Into<String>) -> Self {
        Answer::Unavailable {
            message: message.into(),
            reason: Some(ErrorKind::Resolution),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Answer::Available(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Answer::Available(_) => None,
            Answer::Unavailable { message, .. } => Some(message),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Answer::Available(data) => Some(data),
            Answer::Unavailable { .. } => None,
        }
    }
}

impl<T: Serialize> Serialize for Answer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Answer", 4)?;
        match self {
            Answer::Available(data) => {
                s.serialize_field("ok", &true)?;
                s.skip_field("message")?;
                s.skip_field("reason")?;
                s.serialize_field("data", data)?;
            }
            Answer::Unavailable { message, reason } => {
                s.serialize_field("ok", &false)?;
                s.serialize_field("message", message)?;
                match reason {
                    Some(reason) => s.serialize_field("reason", reason)?,
                    None => s.skip_field("reason")?,
                }
                s.skip_field("data")?;
            }
        }
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub current: CurrentConditions,
    pub next_days: Vec<DaySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub category: String,
    pub address: String,
    pub url: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantList {
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityList {
    pub source: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelOption {
    pub name: String,
    pub city: String,
    pub stars: u8,
    pub nightly_price: Option<f64>,
    pub total_price: Option<f64>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelList {
    pub hotels: Vec<HotelOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightOption {
    pub airline: String,
    pub price: String,
    pub depart_time: String,
    pub arrive_time: String,
    pub stops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightLegs {
    pub origin: String,
    pub destination: String,
    pub outbound: Vec<FlightOption>,
    pub inbound: Vec<FlightOption>,
}

/// Payload of a completed section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionData {
    Weather(Answer<WeatherReport>),
    Restaurants(Answer<RestaurantList>),
    Activities(Answer<ActivityList>),
    Hotels(Answer<HotelList>),
    Flights(Answer<FlightLegs>),
}

impl SectionData {
    pub fn is_available(&self) -> bool {
        self.message().is_none()
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SectionData::Weather(a) => a.message(),
            SectionData::Restaurants(a) => a.message(),
            SectionData::Activities(a) => a.message(),
            SectionData::Hotels(a) => a.message(),
            SectionData::Flights(a) => a.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TripBrief {
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub nights: i64,
    pub adults: u8,
    pub resolved: ResolvedCodes,
    pub sections: BTreeMap<SectionKind, SectionOutcome<SectionData>>,
}

impl TripBrief {
    pub fn section(&self, kind: SectionKind) -> Option<&SectionOutcome<SectionData>> {
        self.sections.get(&kind)
    }
}
