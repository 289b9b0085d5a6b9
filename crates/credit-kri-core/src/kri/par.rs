//! Portfolio-at-risk buckets.
//!
//! PAR(n) is the balance at n+ DPD over total balance. Only PAR30 and PAR90
//! are held against a limit; PAR60 and PAR180 are informational.

use serde::{Deserialize, Serialize};

use super::aggregation::{group_by, totals, Dimension, GroupAccumulator};
use crate::config::{within_limit, RiskAppetite};
use crate::portfolio::LoanRecord;
use crate::types::{Money, Percent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParBucket {
    pub balance: Money,
    pub ratio: Percent,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within_risk_appetite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_appetite_limit: Option<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPar {
    pub customer_segment: String,
    pub par30_ratio: Percent,
    pub par90_ratio: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParMetrics {
    pub par30: ParBucket,
    pub par60: ParBucket,
    pub par90: ParBucket,
    pub par180: ParBucket,
    pub by_segment: Vec<SegmentPar>,
}

pub fn calculate_par_metrics(loans: &[LoanRecord], appetite: &RiskAppetite) -> ParMetrics {
    let book = totals(loans);

    ParMetrics {
        par30: bucket(&book, 30, Some(appetite.par30_ratio_max)),
        par60: bucket(&book, 60, None),
        par90: bucket(&book, 90, Some(appetite.par90_ratio_max)),
        par180: bucket(&book, 180, None),
        by_segment: group_by(loans, Dimension::Segment)
            .into_iter()
            .map(|(customer_segment, acc)| SegmentPar {
                customer_segment,
                par30_ratio: acc.par(30).2,
                par90_ratio: acc.par(90).2,
            })
            .collect(),
    }
}

fn bucket(book: &GroupAccumulator, days: u32, limit: Option<Percent>) -> ParBucket {
    let (balance, count, ratio) = book.par(days);
    ParBucket {
        balance,
        ratio,
        count,
        within_risk_appetite: limit.map(|l| within_limit(ratio, l)),
        risk_appetite_limit: limit,
    }
}
