use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::classification::LoanClass;
use crate::config::DAYS_PER_MONTH;
use crate::error::KriError;
use crate::types::{Money, Percent};
use crate::KriResult;

/// One loan at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: String,
    pub customer_segment: String,
    pub province: String,
    pub industry: String,
    pub loan_type: String,
    pub origination_date: NaiveDate,
    /// Months elapsed since origination (30.44-day months).
    pub months_on_book: Decimal,
    #[serde(alias = "original_amount_vnd_mil")]
    pub original_amount: Money,
    #[serde(alias = "outstanding_balance_vnd_mil")]
    pub outstanding_balance: Money,
    /// Annual contractual rate in percent, e.g. 12.5.
    #[serde(alias = "interest_rate_pct")]
    pub interest_rate: Percent,
    pub days_past_due: u32,
    pub loan_classification: LoanClass,
    /// Origination cohort, `YYYYQn`.
    pub vintage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
}

impl LoanRecord {
    /// Recompute `months_on_book` and `vintage` from `origination_date`.
    pub fn refresh_derived(&mut self, as_of: NaiveDate) {
        self.months_on_book = months_between(self.origination_date, as_of);
        self.vintage = vintage_key(self.origination_date);
    }
}

/// Origination cohort key, e.g. `2024Q3`.
pub fn vintage_key(date: NaiveDate) -> String {
    format!("{}Q{}", date.year(), (date.month() - 1) / 3 + 1)
}

/// Months on book between two dates, floored at zero and rounded to 2dp.
pub fn months_between(origination: NaiveDate, as_of: NaiveDate) -> Decimal {
    let days = (as_of - origination).num_days();
    if days <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(days) / DAYS_PER_MONTH).round_dp(2)
}

/// Reject records the engine cannot aggregate faithfully.
///
/// Balances above the original amount are tolerated; see
/// [`data_quality_notes`].
pub fn validate_loans<'a, I>(loans: I, context: &str) -> KriResult<()>
where
    I: IntoIterator<Item = &'a LoanRecord>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    for loan in loans {
        if loan.loan_id.trim().is_empty() {
            return Err(KriError::invalid(
                "loan_id",
                format!("{context}: loan with empty identifier"),
            ));
        }
        if !seen.insert(loan.loan_id.as_str()) {
            return Err(KriError::invalid(
                "loan_id",
                format!("{context}: duplicate loan '{}'", loan.loan_id),
            ));
        }
        if loan.outstanding_balance < Decimal::ZERO {
            return Err(KriError::invalid(
                "outstanding_balance",
                format!("{context}: loan '{}' has negative balance", loan.loan_id),
            ));
        }
        if loan.original_amount < Decimal::ZERO {
            return Err(KriError::invalid(
                "original_amount",
                format!(
                    "{context}: loan '{}' has negative original amount",
                    loan.loan_id
                ),
            ));
        }
        if loan.months_on_book < Decimal::ZERO {
            return Err(KriError::invalid(
                "months_on_book",
                format!(
                    "{context}: loan '{}' has negative months on book",
                    loan.loan_id
                ),
            ));
        }
    }
    Ok(())
}

/// Non-fatal anomalies worth surfacing alongside the results.
pub fn data_quality_notes(loans: &[LoanRecord]) -> Vec<String> {
    let over_drawn = loans
        .iter()
        .filter(|l| l.outstanding_balance > l.original_amount)
        .count();
    let mut notes = Vec::new();
    if over_drawn > 0 {
        notes.push(format!(
            "{over_drawn} loan(s) report an outstanding balance above the original amount"
        ));
    }
    let high_rate = loans.iter().filter(|l| l.interest_rate > dec!(100)).count();
    if high_rate > 0 {
        notes.push(format!(
            "{high_rate} loan(s) report an interest rate above 100%; rates are expected in percent"
        ));
    }
    notes
}
