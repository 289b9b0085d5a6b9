use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios expressed as percentages (3.0 = 3%). Every KRI ratio uses this scale.
pub type Percent = Decimal;

/// `part / whole` as a percentage, defined as zero when `whole` is zero.
///
/// Every ratio in the engine goes through here so that a degenerate group
/// (no balance, no loans) reports 0 instead of failing.
pub fn pct_of(part: Decimal, whole: Decimal) -> Percent {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * dec!(100)
    }
}

/// Arithmetic mean of `sum` over `count` items, zero for an empty set.
pub fn mean_of(sum: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_of_zero_denominator() {
        assert_eq!(pct_of(dec!(50), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_pct_of() {
        assert_eq!(pct_of(dec!(300), dec!(400)), dec!(75));
    }

    #[test]
    fn test_mean_of_empty() {
        assert_eq!(mean_of(dec!(10), 0), Decimal::ZERO);
        assert_eq!(mean_of(dec!(10), 4), dec!(2.5));
    }
}
