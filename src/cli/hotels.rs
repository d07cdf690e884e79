use crate::brief::{ensure_not_past, parse_iso_date, validate_adults, validate_location_code};
use crate::cli::{load_config, HotelsArgs};
use crate::output::{render_hotels, render_outcome_line};
use crate::provider::{create_providers, HotelQuery};
use crate::runner::{TaskBudget, TaskExecutor};
use chrono::Utc;
use std::path::Path;

pub async fn execute(args: HotelsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let city_code = validate_location_code(&args.city, "city", "PAR")?;
    let check_in = parse_iso_date(&args.check_in)?;
    let check_out = parse_iso_date(&args.check_out)?;
    ensure_not_past(check_in, Utc::now().date_naive())?;
    if check_out < check_in {
        anyhow::bail!("Check-out date must not be before check-in date.");
    }
    let adults = validate_adults(args.adults)?;

    let config = load_config(config_path)?;
    let executor = TaskExecutor::from_config(&config);
    let budget = TaskBudget::from(&config.sections.hotels);
    let hotels = create_providers(&config)?.hotels;

    let query = HotelQuery {
        city_code,
        check_in,
        check_out,
        adults,
    };

    let outcome = executor
        .run("hotels", budget, {
            let query = query.clone();
            move || {
                let hotels = hotels.clone();
                let query = query.clone();
                async move { hotels.hotel_options(&query).await }
            }
        })
        .await;

    let Some(answer) = outcome.data() else {
        anyhow::bail!("{}", render_outcome_line(&outcome));
    };

    let header = format!(
        "Hotels in {} from {} to {} ({} night(s), adults: {})",
        query.city_code,
        query.check_in,
        query.check_out,
        query.nights(),
        query.adults
    );
    print!("{}", render_hotels(&header, answer));
    Ok(())
}
