use serde_json::Value;

use super::PortfolioArgs;

pub fn run_npl(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_npl_metrics(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_par(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_par_metrics(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_quality(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_quality_distribution(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_concentration(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_concentration_risk(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_vintage(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_vintage_analysis(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_segments(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_segment_performance(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_early_warning(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (engine, portfolio) = args.load()?;
    let result = engine.calculate_early_warning(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}
