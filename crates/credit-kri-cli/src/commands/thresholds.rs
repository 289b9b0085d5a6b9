use clap::Args;
use serde_json::Value;

use super::load_engine;

#[derive(Args)]
pub struct ThresholdsArgs {
    #[arg(long)]
    pub thresholds: Option<String>,
}

/// Effective risk-appetite limits after merging the file over the defaults.
pub fn run_thresholds(args: ThresholdsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = load_engine(args.thresholds.as_deref())?;
    Ok(serde_json::to_value(engine.risk_appetite())?)
}
