use crate::config::Config;
use schemars::schema_for;

/// Print the JSON Schema of tripbrief.yaml
pub fn execute() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    serde_json::to_writer_pretty(std::io::stdout().lock(), &schema)?;
    println!();
    Ok(())
}
