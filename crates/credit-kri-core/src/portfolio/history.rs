use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::loan::LoanRecord;

/// A portfolio observed on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_date: NaiveDate,
    pub loans: Vec<LoanRecord>,
}

/// Snapshots of the book over time. The same `loan_id` recurs across
/// snapshots; loans appear on origination and vanish on payoff/write-off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub snapshots: Vec<Snapshot>,
}

impl HistoricalSeries {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// Group flat `(snapshot_date, loan)` rows into snapshots, oldest first.
    pub fn from_tagged<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, LoanRecord)>,
    {
        let mut by_date: BTreeMap<NaiveDate, Vec<LoanRecord>> = BTreeMap::new();
        for (date, loan) in rows {
            by_date.entry(date).or_default().push(loan);
        }
        Self {
            snapshots: by_date
                .into_iter()
                .map(|(snapshot_date, loans)| Snapshot {
                    snapshot_date,
                    loans,
                })
                .collect(),
        }
    }

    /// Distinct snapshot dates, ascending.
    pub fn snapshot_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.snapshots.iter().map(|s| s.snapshot_date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// All loans recorded on `date`, across every snapshot carrying it.
    pub fn loans_on(&self, date: NaiveDate) -> Vec<&LoanRecord> {
        self.snapshots
            .iter()
            .filter(|s| s.snapshot_date == date)
            .flat_map(|s| s.loans.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.iter().all(|s| s.loans.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::classification::LoanClass;
    use crate::portfolio::loan::fixtures::loan;
    use rust_decimal_macros::dec;

    fn date(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, 1).unwrap()
    }

    #[test]
    fn test_from_tagged_groups_and_orders() {
        let rows = vec![
            (date(3), loan("A", dec!(1), LoanClass::Class1, 0)),
            (date(1), loan("A", dec!(1), LoanClass::Class1, 0)),
            (date(3), loan("B", dec!(1), LoanClass::Class2, 0)),
        ];
        let series = HistoricalSeries::from_tagged(rows);
        assert_eq!(series.snapshots.len(), 2);
        assert_eq!(series.snapshots[0].snapshot_date, date(1));
        assert_eq!(series.snapshots[1].loans.len(), 2);
    }

    #[test]
    fn test_snapshot_dates_are_distinct_and_sorted() {
        let series = HistoricalSeries::new(vec![
            Snapshot { snapshot_date: date(5), loans: vec![] },
            Snapshot { snapshot_date: date(2), loans: vec![] },
            Snapshot { snapshot_date: date(5), loans: vec![] },
        ]);
        assert_eq!(series.snapshot_dates(), vec![date(2), date(5)]);
        assert!(series.is_empty());
    }

    #[test]
    fn test_loans_on_merges_same_date() {
        let series = HistoricalSeries::new(vec![
            Snapshot {
                snapshot_date: date(5),
                loans: vec![loan("A", dec!(1), LoanClass::Class1, 0)],
            },
            Snapshot {
                snapshot_date: date(5),
                loans: vec![loan("B", dec!(1), LoanClass::Class1, 0)],
            },
        ]);
        assert_eq!(series.loans_on(date(5)).len(), 2);
    }
}
