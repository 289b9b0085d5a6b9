pub mod csv_in;
pub mod file;
pub mod stdin;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;

use credit_kri_core::{HistoricalSeries, LoanRecord, Portfolio};

/// Load the current book from CSV or JSON (by extension), or piped input.
pub fn load_portfolio(path: Option<&str>) -> Result<Portfolio, Box<dyn std::error::Error>> {
    match path {
        Some(p) if is_csv(p)? => {
            let file = File::open(file::resolve_path(p)?)?;
            Ok(Portfolio::new(csv_in::read_loans(file, p)?))
        }
        Some(p) => portfolio_from_value(file::read_json(p)?),
        None => match stdin::read_piped()? {
            Some(text) if stdin::looks_like_json(&text) => {
                portfolio_from_value(serde_json::from_str(&text)?)
            }
            Some(text) => Ok(Portfolio::new(csv_in::read_loans(text.as_bytes(), "stdin")?)),
            None => Err("--portfolio <file.csv|file.json> or stdin required".into()),
        },
    }
}

/// Load a time series: CSV rows with `snapshot_date`, JSON
/// `{"snapshots": [...]}`, or a JSON array of rows with `snapshot_date`.
pub fn load_history(path: &str) -> Result<HistoricalSeries, Box<dyn std::error::Error>> {
    if is_csv(path)? {
        let file = File::open(file::resolve_path(path)?)?;
        return Ok(HistoricalSeries::from_tagged(csv_in::read_tagged_loans(
            file, path,
        )?));
    }
    let value: Value = file::read_json(path)?;
    if let Value::Array(rows) = value {
        let tagged = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| tagged_row(row).map_err(|e| format!("'{path}' row {i}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(HistoricalSeries::from_tagged(tagged));
    }
    Ok(serde_json::from_value(value)?)
}

fn is_csv(path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let resolved = file::resolve_path(path)?;
    Ok(file::extension(&resolved).as_deref() == Some("csv"))
}

/// Accept `{"loans": [...]}` or a bare array of loans.
fn portfolio_from_value(value: Value) -> Result<Portfolio, Box<dyn std::error::Error>> {
    let portfolio = match value {
        Value::Array(_) => Portfolio::new(serde_json::from_value::<Vec<LoanRecord>>(value)?),
        other => serde_json::from_value(other)?,
    };
    Ok(portfolio)
}

#[derive(Deserialize)]
struct SnapshotTag {
    snapshot_date: NaiveDate,
}

fn tagged_row(row: Value) -> Result<(NaiveDate, LoanRecord), serde_json::Error> {
    let tag: SnapshotTag = serde_json::from_value(row.clone())?;
    let loan: LoanRecord = serde_json::from_value(row)?;
    Ok((tag.snapshot_date, loan))
}
