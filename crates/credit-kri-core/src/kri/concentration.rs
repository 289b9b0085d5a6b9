//! Concentration risk.
//!
//! Shares are percentages of total outstanding balance. HHI is the sum of
//! squared percentage-point shares, so a single-category book scores 10000
//! and an even split over N categories scores 10000 / N. Industry and
//! province are held against limits on their largest share (`top_industry`,
//! `top_province`); product and segment are reported as share breakdowns
//! only. `details` maps each category name to its share.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::aggregation::{group_by, Dimension};
use crate::config::{within_limit, RiskAppetite, HHI_HIGH, HHI_MODERATE, TOP_N_CATEGORIES};
use crate::portfolio::LoanRecord;
use crate::types::{pct_of, Money, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationLevel {
    Low,
    Moderate,
    High,
}

impl ConcentrationLevel {
    pub fn from_hhi(hhi: Decimal) -> Self {
        if hhi > HHI_HIGH {
            ConcentrationLevel::High
        } else if hhi > HHI_MODERATE {
            ConcentrationLevel::Moderate
        } else {
            ConcentrationLevel::Low
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConcentrationLevel::Low => "Low",
            ConcentrationLevel::Moderate => "Moderate",
            ConcentrationLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Category shares of total balance, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareBreakdown {
    /// Share of total balance, percent.
    pub details: BTreeMap<String, Percent>,
    /// Outstanding balance per category.
    pub balances: BTreeMap<String, Money>,
}

impl ShareBreakdown {
    fn from_loans(loans: &[LoanRecord], dimension: Dimension, total: Money) -> Self {
        let mut shares = Self::default();
        for (name, acc) in group_by(loans, dimension) {
            shares.details.insert(name.clone(), pct_of(acc.balance, total));
            shares.balances.insert(name, acc.balance);
        }
        shares
    }

    /// Categories by share, largest first; equal shares ordered by name.
    pub fn ranked(&self) -> Vec<(&str, Percent)> {
        let mut ranked: Vec<(&str, Percent)> =
            self.details.iter().map(|(name, share)| (name.as_str(), *share)).collect();
        // Stable sort over name-ordered entries keeps ties alphabetical.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// HHI, level and limit check shared by the industry and province views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationProfile {
    pub top_3_total: Percent,
    pub hhi: Decimal,
    pub concentration_level: ConcentrationLevel,
    pub within_risk_appetite: bool,
    pub risk_appetite_limit: Percent,
    #[serde(flatten)]
    pub shares: ShareBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryConcentration {
    /// Largest single industry share.
    pub top_industry: Percent,
    #[serde(flatten)]
    pub profile: ConcentrationProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceConcentration {
    /// Largest single province share.
    pub top_province: Percent,
    #[serde(flatten)]
    pub profile: ConcentrationProfile,
}

/// Largest single loan against the single-borrower limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestExposure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    pub balance: Money,
    pub share_pct: Percent,
    pub within_risk_appetite: bool,
    pub risk_appetite_limit: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRisk {
    pub industry: IndustryConcentration,
    pub province: ProvinceConcentration,
    pub product: ShareBreakdown,
    pub segment: ShareBreakdown,
    pub largest_exposure: LargestExposure,
}

pub fn calculate_concentration_risk(
    loans: &[LoanRecord],
    appetite: &RiskAppetite,
) -> ConcentrationRisk {
    let total: Money = loans.iter().map(|l| l.outstanding_balance).sum();

    let (top_industry, industry) = profile(
        ShareBreakdown::from_loans(loans, Dimension::Industry, total),
        appetite.industry_concentration_max,
    );
    let (top_province, province) = profile(
        ShareBreakdown::from_loans(loans, Dimension::Province, total),
        appetite.province_concentration_max,
    );

    ConcentrationRisk {
        industry: IndustryConcentration {
            top_industry,
            profile: industry,
        },
        province: ProvinceConcentration {
            top_province,
            profile: province,
        },
        product: ShareBreakdown::from_loans(loans, Dimension::Product, total),
        segment: ShareBreakdown::from_loans(loans, Dimension::Segment, total),
        largest_exposure: largest_exposure(loans, total, appetite.single_borrower_max),
    }
}

/// Sum of squared percentage-point shares.
fn hhi<'a, I>(shares: I) -> Decimal
where
    I: IntoIterator<Item = &'a Percent>,
{
    shares.into_iter().map(|s| s * s).sum()
}

/// Top share and the rest of the profile.
fn profile(shares: ShareBreakdown, limit: Percent) -> (Percent, ConcentrationProfile) {
    let ranked = shares.ranked();
    let top_share = ranked.first().map_or(Decimal::ZERO, |(_, share)| *share);
    let top_3_total = ranked
        .iter()
        .take(TOP_N_CATEGORIES)
        .map(|(_, share)| *share)
        .sum();
    let hhi = hhi(shares.details.values());

    let profile = ConcentrationProfile {
        top_3_total,
        hhi,
        concentration_level: ConcentrationLevel::from_hhi(hhi),
        within_risk_appetite: within_limit(top_share, limit),
        risk_appetite_limit: limit,
        shares,
    };
    (top_share, profile)
}

fn largest_exposure(loans: &[LoanRecord], total: Money, limit: Percent) -> LargestExposure {
    // First loan wins among equal balances so repeated runs agree.
    let largest = loans.iter().fold(None::<&LoanRecord>, |best, loan| match best {
        Some(b) if b.outstanding_balance >= loan.outstanding_balance => Some(b),
        _ => Some(loan),
    });
    let balance = largest.map_or(Decimal::ZERO, |l| l.outstanding_balance);
    let share_pct = pct_of(balance, total);

    LargestExposure {
        loan_id: largest.map(|l| l.loan_id.clone()),
        balance,
        share_pct,
        within_risk_appetite: within_limit(share_pct, limit),
        risk_appetite_limit: limit,
    }
}
