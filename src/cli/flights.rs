use crate::brief::{ensure_not_past, parse_iso_date, validate_adults, validate_location_code};
use crate::cli::{load_config, FlightsArgs};
use crate::output::{render_flights, render_outcome_line};
use crate::provider::{create_providers, FlightQuery};
use crate::runner::{TaskBudget, TaskExecutor};
use chrono::Utc;
use std::path::Path;

pub async fn execute(args: FlightsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    // Everything is checked before any provider is touched
    let origin = validate_location_code(&args.origin, "origin", "SEA")?;
    let destination = validate_location_code(&args.destination, "destination", "LAX")?;
    let departure_date = parse_iso_date(&args.date)?;
    ensure_not_past(departure_date, Utc::now().date_naive())?;
    let adults = validate_adults(args.adults)?;

    let config = load_config(config_path)?;
    let executor = TaskExecutor::from_config(&config);
    let budget = TaskBudget::from(&config.sections.flights);
    let flights = create_providers(&config)?.flights;

    let query = FlightQuery {
        origin,
        destination,
        departure_date,
        adults,
    };

    let outcome = executor
        .run("flights", budget, {
            let query = query.clone();
            move || {
                let flights = flights.clone();
                let query = query.clone();
                async move { flights.one_way(&query).await }
            }
        })
        .await;

    let Some(options) = outcome.data() else {
        anyhow::bail!("{}", render_outcome_line(&outcome));
    };

    let header = format!(
        "Flights {} → {} on {} (adults: {})",
        query.origin, query.destination, query.departure_date, query.adults
    );
    print!("{}", render_flights(&header, options));
    Ok(())
}
