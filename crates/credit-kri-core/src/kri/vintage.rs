use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::{group_by, Dimension};
use crate::portfolio::LoanRecord;
use crate::types::{Money, Percent};

/// Performance of one origination cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VintageRow {
    pub vintage: String,
    pub total_loans: u64,
    pub total_balance: Money,
    pub npl_count: u64,
    pub npl_balance: Money,
    pub npl_ratio: Percent,
    pub avg_dpd: Decimal,
}

/// Rows are ordered by cohort key, which for `YYYYQn` is chronological.
pub fn calculate_vintage_analysis(loans: &[LoanRecord]) -> Vec<VintageRow> {
    group_by(loans, Dimension::Vintage)
        .into_iter()
        .map(|(vintage, acc)| VintageRow {
            vintage,
            total_loans: acc.count,
            total_balance: acc.balance,
            npl_count: acc.npl_count,
            npl_balance: acc.npl_balance,
            npl_ratio: acc.npl_ratio(),
            avg_dpd: acc.avg_dpd(),
        })
        .collect()
}
