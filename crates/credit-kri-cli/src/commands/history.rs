use clap::Args;
use serde_json::Value;

use super::load_engine;
use crate::input;

/// Options for commands that read a snapshot time series.
#[derive(Args)]
pub struct HistoryArgs {
    /// Snapshot time series: CSV/JSON rows with `snapshot_date`, or
    /// JSON `{"snapshots": [...]}`
    #[arg(long)]
    pub history: String,

    #[arg(long)]
    pub thresholds: Option<String>,
}

pub fn run_migration(args: HistoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = load_engine(args.thresholds.as_deref())?;
    let history = input::load_history(&args.history)?;
    let result = engine.calculate_migration_matrix(&history)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_trend(args: HistoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = load_engine(args.thresholds.as_deref())?;
    let history = input::load_history(&args.history)?;
    let result = engine.calculate_kri_trend(&history)?;
    Ok(serde_json::to_value(result)?)
}
