//! Key risk indicators for a bank loan portfolio.
//!
//! [`KriEngine`] turns a flat [`Portfolio`] of loan records into NPL, PAR,
//! quality, concentration, vintage, segment and early-warning metrics, each
//! held against fixed [`RiskAppetite`] limits. A [`HistoricalSeries`] of
//! snapshots additionally yields a classification migration matrix and a
//! per-date trend of the headline ratios.
//!
//! All arithmetic uses `rust_decimal::Decimal`. Ratios are percentages and
//! are zero whenever their denominator is zero.

pub mod config;
pub mod engine;
pub mod error;
pub mod kri;
pub mod portfolio;
pub mod types;

pub use config::RiskAppetite;
pub use engine::{KriEngine, KriReportOutput};
pub use error::KriError;
pub use kri::{KriReport, MigrationMatrix, MigrationTable, RiskAppetiteBreach, TrendPoint};
pub use portfolio::{HistoricalSeries, LoanClass, LoanRecord, Portfolio, Snapshot, ALL_CLASSES};
pub use types::*;

/// Standard result type for all KRI operations
pub type KriResult<T> = Result<T, KriError>;
