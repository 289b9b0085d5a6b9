mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::history::HistoryArgs;
use commands::report::ReportArgs;
use commands::thresholds::ThresholdsArgs;
use commands::PortfolioArgs;

/// Key risk indicators for a loan portfolio
#[derive(Parser)]
#[command(
    name = "kri",
    version,
    about = "Key risk indicators for a loan portfolio",
    long_about = "A CLI for computing credit-risk KRIs over a loan book with decimal \
                  precision: NPL and PAR ratios, quality distribution, HHI concentration, \
                  vintage and segment performance, early-warning signals and \
                  classification migration between snapshots."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (logs go to stderr)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full KRI report with risk-appetite warnings
    Report(ReportArgs),
    /// Non-performing loan ratios and breakdowns
    Npl(PortfolioArgs),
    /// Portfolio-at-risk buckets (30/60/90/180 DPD)
    Par(PortfolioArgs),
    /// Distribution across classification classes
    Quality(PortfolioArgs),
    /// Industry, province, product and segment concentration
    Concentration(PortfolioArgs),
    /// Performance by origination quarter
    Vintage(PortfolioArgs),
    /// Performance by customer segment
    Segments(PortfolioArgs),
    /// Early delinquency, watch list and new-loan issues
    EarlyWarning(PortfolioArgs),
    /// Classification migration between the two latest snapshots
    Migration(HistoryArgs),
    /// NPL, PAR30 and PAR90 ratios for each snapshot date
    Trend(HistoryArgs),
    /// Print the effective risk-appetite limits
    Thresholds(ThresholdsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Npl(args) => commands::kri::run_npl(args),
        Commands::Par(args) => commands::kri::run_par(args),
        Commands::Quality(args) => commands::kri::run_quality(args),
        Commands::Concentration(args) => commands::kri::run_concentration(args),
        Commands::Vintage(args) => commands::kri::run_vintage(args),
        Commands::Segments(args) => commands::kri::run_segments(args),
        Commands::EarlyWarning(args) => commands::kri::run_early_warning(args),
        Commands::Migration(args) => commands::history::run_migration(args),
        Commands::Trend(args) => commands::history::run_trend(args),
        Commands::Thresholds(args) => commands::thresholds::run_thresholds(args),
        Commands::Version => {
            println!("kri {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
