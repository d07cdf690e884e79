use crate::brief::TripRequest;
use crate::cli::{load_config, BriefArgs};
use crate::output::{render_brief, render_summary};
use crate::provider::create_providers;
use crate::runner::Orchestrator;
use serde_json::json;
use std::path::Path;
use tracing::info;

pub async fn execute(args: BriefArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let request = TripRequest {
        destination: args.destination,
        depart_date: args.depart,
        return_date: args.return_date,
        adults: args.adults,
        origin: args.origin,
    };

    let providers = create_providers(&config)?;
    let orchestrator = Orchestrator::new(config, providers);

    let brief = match orchestrator.plan(&request).await {
        Ok(brief) => brief,
        Err(e) if args.json => {
            let body = json!({ "ok": false, "kind": e.kind(), "message": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let completed = brief.sections.values().filter(|o| o.is_ok()).count();
    info!(
        "Brief for {} ready: {}/{} sections completed",
        brief.destination,
        completed,
        brief.sections.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&brief)?);
    } else if args.summary {
        print!("{}", render_summary(&brief));
    } else {
        print!("{}", render_brief(&brief));
    }

    Ok(())
}
