use crate::brief::{
    Activity, ActivityList, Answer, FlightLegs, HotelList, ResolvedCodes, RestaurantList,
    SectionData, SectionKind, TripPlan, WeatherReport,
};
use crate::error::UpstreamError;
use crate::provider::{FlightQuery, HotelQuery, Providers};
use tracing::{debug, warn};

pub const PRIMARY_ACTIVITY_SOURCE: &str = "Amadeus";
pub const FALLBACK_ACTIVITY_SOURCE: &str = "Fallback suggestions";

/// Everything a section task reads. Built once per request after code
/// resolution and shared read-only by all five tasks.
pub struct SectionContext {
    pub plan: TripPlan,
    pub codes: ResolvedCodes,
    pub providers: Providers,
}

pub async fn run(kind: SectionKind, ctx: &SectionContext) -> Result<SectionData, UpstreamError> {
    match kind {
        SectionKind::Weather => weather(ctx).await.map(SectionData::Weather),
        SectionKind::Restaurants => restaurants(ctx).await.map(SectionData::Restaurants),
        SectionKind::Activities => activities(ctx).await.map(SectionData::Activities),
        SectionKind::Hotels => hotels(ctx).await.map(SectionData::Hotels),
        SectionKind::Flights => flights(ctx).await.map(SectionData::Flights),
    }
}

async fn weather(ctx: &SectionContext) -> Result<Answer<WeatherReport>, UpstreamError> {
    ctx.providers.weather.weather(&ctx.plan.destination).await
}

async fn restaurants(ctx: &SectionContext) -> Result<Answer<RestaurantList>, UpstreamError> {
    ctx.providers
        .restaurants
        .top_restaurants(&ctx.plan.destination)
        .await
}

async fn activities(ctx: &SectionContext) -> Result<Answer<ActivityList>, UpstreamError> {
    let destination = &ctx.plan.destination;

    let Some(point) = ctx.providers.geocoder.geocode(destination).await? else {
        return Ok(Answer::unresolved(format!(
            "Couldn't find \"{}\". Try \"City, Country\".",
            destination
        )));
    };

    // An empty or failing primary source is not a failure of the section
    let found = match ctx.providers.activities.activities_near(&point).await {
        Ok(found) => found,
        Err(e) => {
            warn!("Activity lookup near {} failed: {}", point.name, e);
            Vec::new()
        }
    };

    if found.is_empty() {
        debug!("No activities near {}, using suggestions", point.name);
        return Ok(Answer::Available(ActivityList {
            source: FALLBACK_ACTIVITY_SOURCE.to_string(),
            activities: fallback_activities(destination),
        }));
    }

    Ok(Answer::Available(ActivityList {
        source: PRIMARY_ACTIVITY_SOURCE.to_string(),
        activities: found,
    }))
}

pub fn fallback_activities(destination: &str) -> Vec<Activity> {
    [
        "City highlights tour in",
        "Food tasting / local cuisine in",
        "Top museum or cultural site in",
        "Nature walk or scenic viewpoint in",
        "Popular neighborhood exploration in",
    ]
    .iter()
    .map(|prefix| Activity {
        name: format!("{} {}", prefix, destination),
        description: None,
        price: None,
        booking_link: None,
    })
    .collect()
}

async fn hotels(ctx: &SectionContext) -> Result<Answer<HotelList>, UpstreamError> {
    let Some(city_code) = &ctx.codes.city_code else {
        return Ok(Answer::unresolved(
            "Hotel lookup needs an IATA city code (like PAR/NYC/LON). \
             I couldn't auto-resolve it for this destination.",
        ));
    };

    ctx.providers
        .hotels
        .hotel_options(&HotelQuery {
            city_code: city_code.clone(),
            check_in: ctx.plan.depart_date,
            check_out: ctx.plan.return_date,
            adults: ctx.plan.adults,
        })
        .await
}

async fn flights(ctx: &SectionContext) -> Result<Answer<FlightLegs>, UpstreamError> {
    let Some(origin) = &ctx.codes.origin_code else {
        return Ok(Answer::unresolved(
            "Flights need an origin airport IATA code (example: SEA). \
             Set DEFAULT_ORIGIN_IATA or pass --origin.",
        ));
    };
    let Some(destination) = &ctx.codes.dest_airport_code else {
        return Ok(Answer::unresolved(
            "Flights need a destination airport IATA code (example: LAX). \
             I couldn't auto-resolve it for this destination.",
        ));
    };

    let outbound = FlightQuery {
        origin: origin.clone(),
        destination: destination.clone(),
        departure_date: ctx.plan.depart_date,
        adults: ctx.plan.adults,
    };
    let inbound = FlightQuery {
        origin: destination.clone(),
        destination: origin.clone(),
        departure_date: ctx.plan.return_date,
        adults: ctx.plan.adults,
    };

    let flights = &ctx.providers.flights;
    let (outbound, inbound) =
        tokio::try_join!(flights.one_way(&outbound), flights.one_way(&inbound))?;

    Ok(Answer::Available(FlightLegs {
        origin: origin.clone(),
        destination: destination.clone(),
        outbound,
        inbound,
    }))
}
