//! Risk-appetite limits and the fixed business rules around them.
//!
//! The six limits in [`RiskAppetite`] are the only tunable inputs of the
//! engine. Everything else here is fixed policy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::KriError;
use crate::types::Percent;
use crate::KriResult;

/// A loan is non-performing at or beyond this many days past due.
pub const NPL_DPD_THRESHOLD: u32 = 90;

/// PAR buckets reported, in days past due.
pub const PAR_BUCKETS: [u32; 4] = [30, 60, 90, 180];

/// Early delinquency: strictly between current and the first PAR bucket.
pub const EARLY_DELINQUENCY_MIN_DPD: u32 = 1;
pub const EARLY_DELINQUENCY_MAX_DPD: u32 = 29;

/// Loans younger than this (in months on book) count as new.
pub const NEW_LOAN_MONTHS: Decimal = dec!(6);

/// HHI strictly above this is High concentration.
pub const HHI_HIGH: Decimal = dec!(2500);
/// HHI strictly above this (and not High) is Moderate concentration.
pub const HHI_MODERATE: Decimal = dec!(1500);

/// Number of leading categories summed into the top-N share.
pub const TOP_N_CATEGORIES: usize = 3;

/// Average month length used for months-on-book.
pub const DAYS_PER_MONTH: Decimal = dec!(30.44);

/// Risk-appetite limits, all in percent. A metric is within appetite when it
/// is strictly below its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAppetite {
    pub npl_ratio_max: Percent,
    pub par30_ratio_max: Percent,
    pub par90_ratio_max: Percent,
    pub single_borrower_max: Percent,
    pub industry_concentration_max: Percent,
    pub province_concentration_max: Percent,
}

impl Default for RiskAppetite {
    fn default() -> Self {
        Self {
            npl_ratio_max: dec!(3.0),
            par30_ratio_max: dec!(5.0),
            par90_ratio_max: dec!(3.5),
            single_borrower_max: dec!(15.0),
            industry_concentration_max: dec!(25.0),
            province_concentration_max: dec!(40.0),
        }
    }
}

impl RiskAppetite {
    /// Limits as `(name, value)` pairs, in declaration order.
    pub fn limits(&self) -> [(&'static str, Percent); 6] {
        [
            ("npl_ratio_max", self.npl_ratio_max),
            ("par30_ratio_max", self.par30_ratio_max),
            ("par90_ratio_max", self.par90_ratio_max),
            ("single_borrower_max", self.single_borrower_max),
            ("industry_concentration_max", self.industry_concentration_max),
            ("province_concentration_max", self.province_concentration_max),
        ]
    }

    pub fn validate(&self) -> KriResult<()> {
        for (name, value) in self.limits() {
            if value <= Decimal::ZERO {
                return Err(KriError::invalid(
                    name,
                    format!("limit must be positive, got {value}"),
                ));
            }
            if value > dec!(100) {
                return Err(KriError::invalid(
                    name,
                    format!("limit is a percentage and cannot exceed 100, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Strict comparison used for every limit check.
pub fn within_limit(value: Percent, limit: Percent) -> bool {
    value < limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let appetite = RiskAppetite::default();
        assert!(appetite.validate().is_ok());
        assert_eq!(appetite.npl_ratio_max, dec!(3));
        assert_eq!(appetite.limits().len(), 6);
    }

    #[test]
    fn test_reject_non_positive_limit() {
        let appetite = RiskAppetite {
            par30_ratio_max: Decimal::ZERO,
            ..RiskAppetite::default()
        };
        let err = appetite.validate().unwrap_err();
        assert!(err.to_string().contains("par30_ratio_max"));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let appetite: RiskAppetite = serde_json::from_str(r#"{"npl_ratio_max": "2.5"}"#).unwrap();
        assert_eq!(appetite.npl_ratio_max, dec!(2.5));
        assert_eq!(appetite.province_concentration_max, dec!(40));
    }

    #[test]
    fn test_within_limit_is_strict() {
        assert!(within_limit(dec!(2.99), dec!(3)));
        assert!(!within_limit(dec!(3), dec!(3)));
    }
}
