//! Grouped reduction shared by every breakdown table.
//!
//! Loans are folded into one [`GroupAccumulator`] per dimension value, then
//! each calculation maps accumulators to its own row type. Ratios are taken
//! with [`pct_of`] only, so a zero-balance group always reports 0.
//!
//! Two NPL tallies are kept. The headline and vintage use [`is_npl`]; the
//! dimension breakdowns and segment performance count classified NPLs only
//! (Class4/Class5), so a DPD-only loan shows in the headline but not there.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{NPL_DPD_THRESHOLD, PAR_BUCKETS};
use crate::portfolio::LoanRecord;
use crate::types::{mean_of, pct_of, Money, Percent};

/// Non-performing: doubtful/loss classification, or 90+ DPD regardless of
/// classification.
pub fn is_npl(loan: &LoanRecord) -> bool {
    loan.loan_classification.is_npl() || loan.days_past_due >= NPL_DPD_THRESHOLD
}

/// Categorical field a breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Segment,
    Product,
    Industry,
    Province,
    Vintage,
}

impl Dimension {
    pub fn key<'a>(&self, loan: &'a LoanRecord) -> &'a str {
        match self {
            Dimension::Segment => &loan.customer_segment,
            Dimension::Product => &loan.loan_type,
            Dimension::Industry => &loan.industry,
            Dimension::Province => &loan.province,
            Dimension::Vintage => &loan.vintage,
        }
    }

    /// Tag a group value with the loan field it came from.
    pub fn group_key(&self, value: String) -> GroupKey {
        match self {
            Dimension::Segment => GroupKey::Segment(value),
            Dimension::Product => GroupKey::Product(value),
            Dimension::Industry => GroupKey::Industry(value),
            Dimension::Province => GroupKey::Province(value),
            Dimension::Vintage => GroupKey::Vintage(value),
        }
    }
}

/// A breakdown row's group column. Flattened into the row, it serialises as
/// the loan field name (`"customer_segment": "SME"`, `"loan_type": ...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    #[serde(rename = "customer_segment")]
    Segment(String),
    #[serde(rename = "loan_type")]
    Product(String),
    #[serde(rename = "industry")]
    Industry(String),
    #[serde(rename = "province")]
    Province(String),
    #[serde(rename = "vintage")]
    Vintage(String),
}

impl GroupKey {
    pub fn value(&self) -> &str {
        match self {
            GroupKey::Segment(v)
            | GroupKey::Product(v)
            | GroupKey::Industry(v)
            | GroupKey::Province(v)
            | GroupKey::Vintage(v) => v,
        }
    }
}

/// Running totals for one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupAccumulator {
    pub count: u64,
    pub balance: Money,
    pub npl_count: u64,
    pub npl_balance: Money,
    /// Loans classified Class4/Class5, whatever their DPD.
    pub classified_npl_count: u64,
    pub classified_npl_balance: Money,
    /// Balance at or beyond each of `PAR_BUCKETS`, same order.
    pub par_balance: [Money; PAR_BUCKETS.len()],
    pub par_count: [u64; PAR_BUCKETS.len()],
    pub dpd_sum: u64,
    pub rate_sum: Decimal,
    pub months_on_book_sum: Decimal,
    pub max_balance: Money,
}

impl GroupAccumulator {
    pub fn add(&mut self, loan: &LoanRecord) {
        let balance = loan.outstanding_balance;
        self.count += 1;
        self.balance += balance;
        if is_npl(loan) {
            self.npl_count += 1;
            self.npl_balance += balance;
        }
        if loan.loan_classification.is_npl() {
            self.classified_npl_count += 1;
            self.classified_npl_balance += balance;
        }
        for (i, bucket) in PAR_BUCKETS.iter().enumerate() {
            if loan.days_past_due >= *bucket {
                self.par_balance[i] += balance;
                self.par_count[i] += 1;
            }
        }
        self.dpd_sum += u64::from(loan.days_past_due);
        self.rate_sum += loan.interest_rate;
        self.months_on_book_sum += loan.months_on_book;
        if balance > self.max_balance {
            self.max_balance = balance;
        }
    }

    pub fn npl_count_ratio(&self) -> Percent {
        pct_of(Decimal::from(self.npl_count), Decimal::from(self.count))
    }

    pub fn npl_ratio(&self) -> Percent {
        pct_of(self.npl_balance, self.balance)
    }

    pub fn classified_npl_ratio(&self) -> Percent {
        pct_of(self.classified_npl_balance, self.balance)
    }

    /// Balance, count and ratio for a PAR bucket in days (30/60/90/180).
    pub fn par(&self, days: u32) -> (Money, u64, Percent) {
        match PAR_BUCKETS.iter().position(|b| *b == days) {
            Some(i) => (
                self.par_balance[i],
                self.par_count[i],
                pct_of(self.par_balance[i], self.balance),
            ),
            None => (Decimal::ZERO, 0, Decimal::ZERO),
        }
    }

    pub fn avg_balance(&self) -> Money {
        mean_of(self.balance, self.count)
    }

    pub fn avg_dpd(&self) -> Decimal {
        mean_of(Decimal::from(self.dpd_sum), self.count)
    }

    pub fn avg_interest_rate(&self) -> Percent {
        mean_of(self.rate_sum, self.count)
    }

    pub fn avg_months_on_book(&self) -> Decimal {
        mean_of(self.months_on_book_sum, self.count)
    }
}

/// Fold every loan into the accumulator of its group.
pub fn group_by(loans: &[LoanRecord], dimension: Dimension) -> BTreeMap<String, GroupAccumulator> {
    loans.iter().fold(BTreeMap::new(), |mut groups, loan| {
        groups
            .entry(dimension.key(loan).to_string())
            .or_insert_with(GroupAccumulator::default)
            .add(loan);
        groups
    })
}

/// Fold the whole book into a single accumulator.
pub fn totals<'a, I>(loans: I) -> GroupAccumulator
where
    I: IntoIterator<Item = &'a LoanRecord>,
{
    loans.into_iter().fold(GroupAccumulator::default(), |mut acc, loan| {
        acc.add(loan);
        acc
    })
}

/// Total balance of the loans matching `pred`, and how many there are.
pub fn sum_where<F>(loans: &[LoanRecord], pred: F) -> (Money, u64)
where
    F: Fn(&LoanRecord) -> bool,
{
    loans
        .iter()
        .filter(|l| pred(l))
        .fold((Decimal::ZERO, 0), |(balance, count), l| {
            (balance + l.outstanding_balance, count + 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::loan::fixtures::loan;
    use crate::portfolio::LoanClass;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npl_predicate_is_or() {
        assert!(is_npl(&loan("A", dec!(1), LoanClass::Class4, 0)));
        assert!(is_npl(&loan("B", dec!(1), LoanClass::Class1, 90)));
        assert!(!is_npl(&loan("C", dec!(1), LoanClass::Class3, 89)));
    }

    #[test]
    fn test_dpd_only_loan_is_not_a_classified_npl() {
        let loans = vec![
            loan("A", dec!(100), LoanClass::Class1, 0),
            loan("B", dec!(300), LoanClass::Class1, 120),
            loan("C", dec!(100), LoanClass::Class5, 0),
        ];
        let acc = totals(&loans);
        assert_eq!(acc.npl_count, 2);
        assert_eq!(acc.npl_ratio(), dec!(80));
        assert_eq!(acc.classified_npl_count, 1);
        assert_eq!(acc.classified_npl_ratio(), dec!(20));
    }

    #[test]
    fn test_group_key_serialises_as_loan_field() {
        let key = Dimension::Product.group_key("Mortgage".into());
        assert_eq!(key.value(), "Mortgage");
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            serde_json::json!({ "loan_type": "Mortgage" })
        );
    }

    #[test]
    fn test_group_by_keeps_unknown_values() {
        let mut odd = loan("B", dec!(50), LoanClass::Class1, 0);
        odd.province = "Atlantis".into();
        let loans = vec![loan("A", dec!(100), LoanClass::Class1, 0), odd];
        let groups = group_by(&loans, Dimension::Province);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Atlantis"].balance, dec!(50));
    }

    #[test]
    fn test_zero_balance_group_has_zero_ratios() {
        let loans = vec![loan("A", Decimal::ZERO, LoanClass::Class5, 200)];
        let acc = totals(&loans);
        assert_eq!(acc.npl_count, 1);
        assert_eq!(acc.npl_ratio(), Decimal::ZERO);
        assert_eq!(acc.par(90).2, Decimal::ZERO);
        assert_eq!(acc.npl_count_ratio(), dec!(100));
    }

    #[test]
    fn test_par_buckets_are_cumulative() {
        let loans = vec![
            loan("A", dec!(100), LoanClass::Class1, 0),
            loan("B", dec!(100), LoanClass::Class2, 45),
            loan("C", dec!(100), LoanClass::Class3, 95),
            loan("D", dec!(100), LoanClass::Class5, 200),
        ];
        let acc = totals(&loans);
        assert_eq!(acc.par(30), (dec!(300), 3, dec!(75)));
        assert_eq!(acc.par(60), (dec!(200), 2, dec!(50)));
        assert_eq!(acc.par(90), (dec!(200), 2, dec!(50)));
        assert_eq!(acc.par(180), (dec!(100), 1, dec!(25)));
        assert_eq!(acc.avg_dpd(), dec!(85));
        assert_eq!(acc.max_balance, dec!(100));
    }

    #[test]
    fn test_sum_where() {
        let loans = vec![
            loan("A", dec!(100), LoanClass::Class2, 0),
            loan("B", dec!(40), LoanClass::Class2, 0),
            loan("C", dec!(60), LoanClass::Class1, 0),
        ];
        let (balance, count) = sum_where(&loans, |l| l.loan_classification == LoanClass::Class2);
        assert_eq!(balance, dec!(140));
        assert_eq!(count, 2);
    }
}
