//! Non-performing loan metrics.
//!
//! A loan is NPL when classified Class4/Class5 **or** 90+ days past due. The
//! headline ratio is balance-weighted and compared against `npl_ratio_max`.
//! The four breakdown tables (segment, product, industry, province) count
//! classified NPLs only, so they need not add up to the headline.

use serde::{Deserialize, Serialize};

use super::aggregation::{group_by, totals, Dimension, GroupKey};
use crate::config::{within_limit, RiskAppetite};
use crate::portfolio::LoanRecord;
use crate::types::{pct_of, Money, Percent};

/// One row of an NPL breakdown table, keyed by the loan field it groups on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NplBreakdownRow {
    #[serde(flatten)]
    pub group: GroupKey,
    pub total_balance: Money,
    pub npl_balance: Money,
    pub npl_ratio: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NplMetrics {
    pub npl_count: u64,
    pub npl_count_ratio: Percent,
    pub npl_balance: Money,
    pub npl_balance_ratio: Percent,
    pub total_loans: u64,
    pub total_balance: Money,
    pub within_risk_appetite: bool,
    pub risk_appetite_limit: Percent,
    /// Ratio as a percentage of the limit; above 100 means breach.
    pub risk_appetite_utilization: Percent,
    pub by_segment: Vec<NplBreakdownRow>,
    pub by_product: Vec<NplBreakdownRow>,
    pub by_industry: Vec<NplBreakdownRow>,
    pub by_province: Vec<NplBreakdownRow>,
}

pub fn calculate_npl_metrics(loans: &[LoanRecord], appetite: &RiskAppetite) -> NplMetrics {
    let book = totals(loans);
    let npl_balance_ratio = book.npl_ratio();
    let limit = appetite.npl_ratio_max;

    NplMetrics {
        npl_count: book.npl_count,
        npl_count_ratio: book.npl_count_ratio(),
        npl_balance: book.npl_balance,
        npl_balance_ratio,
        total_loans: book.count,
        total_balance: book.balance,
        within_risk_appetite: within_limit(npl_balance_ratio, limit),
        risk_appetite_limit: limit,
        risk_appetite_utilization: pct_of(npl_balance_ratio, limit),
        by_segment: npl_breakdown(loans, Dimension::Segment),
        by_product: npl_breakdown(loans, Dimension::Product),
        by_industry: npl_breakdown(loans, Dimension::Industry),
        by_province: npl_breakdown(loans, Dimension::Province),
    }
}

fn npl_breakdown(loans: &[LoanRecord], dimension: Dimension) -> Vec<NplBreakdownRow> {
    group_by(loans, dimension)
        .into_iter()
        .map(|(name, acc)| NplBreakdownRow {
            group: dimension.group_key(name),
            total_balance: acc.balance,
            npl_balance: acc.classified_npl_balance,
            npl_ratio: acc.classified_npl_ratio(),
        })
        .collect()
}
