pub mod history;
pub mod kri;
pub mod report;
pub mod thresholds;

use chrono::NaiveDate;
use clap::Args;

use credit_kri_core::{KriEngine, Portfolio, RiskAppetite};

use crate::input;

/// Options shared by every command that reads the current book.
#[derive(Args, Debug, Clone)]
pub struct PortfolioArgs {
    /// Loan records: CSV with a header row, JSON `{"loans": [...]}` or a JSON
    /// array. Read from stdin when omitted.
    #[arg(long)]
    pub portfolio: Option<String>,

    /// Risk-appetite limits (JSON or YAML); unset limits keep their defaults
    #[arg(long)]
    pub thresholds: Option<String>,

    /// Recompute months on book and vintage as of this date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl PortfolioArgs {
    pub fn load(&self) -> Result<(KriEngine, Portfolio), Box<dyn std::error::Error>> {
        let engine = load_engine(self.thresholds.as_deref())?;
        let mut portfolio = input::load_portfolio(self.portfolio.as_deref())?;
        if let Some(as_of) = self.as_of {
            portfolio.refresh_derived(as_of);
        }
        tracing::debug!(loans = portfolio.len(), "portfolio loaded");
        Ok((engine, portfolio))
    }
}

pub fn load_engine(thresholds: Option<&str>) -> Result<KriEngine, Box<dyn std::error::Error>> {
    let appetite = match thresholds {
        Some(path) => input::file::read_config::<RiskAppetite>(path)?,
        None => RiskAppetite::default(),
    };
    Ok(KriEngine::new(appetite)?)
}
