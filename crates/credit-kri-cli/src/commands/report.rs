use clap::Args;
use serde_json::Value;

use super::PortfolioArgs;
use crate::input;

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: PortfolioArgs,

    /// Snapshot time series; adds the migration matrix to the report
    #[arg(long)]
    pub history: Option<String>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.common.load()?;
    let history = args
        .history
        .as_deref()
        .map(input::load_history)
        .transpose()?;
    let result = engine.generate_report(&portfolio, history.as_ref())?;
    Ok(serde_json::to_value(result)?)
}
