//! Headline ratios per snapshot date.
//!
//! One point per distinct date, oldest first. NPL here is the classified
//! ratio (Class4/Class5 balance); delinquency shows in the PAR columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregation::totals;
use crate::portfolio::loan::validate_loans;
use crate::portfolio::HistoricalSeries;
use crate::types::Percent;
use crate::KriResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub snapshot_date: NaiveDate,
    pub npl_ratio: Percent,
    pub par30_ratio: Percent,
    pub par90_ratio: Percent,
}

pub fn calculate_kri_trend(history: &HistoricalSeries) -> KriResult<Vec<TrendPoint>> {
    history
        .snapshot_dates()
        .into_iter()
        .map(|date| {
            let loans = history.loans_on(date);
            validate_loans(loans.iter().copied(), &format!("snapshot {date}"))?;
            let acc = totals(loans);
            Ok(TrendPoint {
                snapshot_date: date,
                npl_ratio: acc.classified_npl_ratio(),
                par30_ratio: acc.par(30).2,
                par90_ratio: acc.par(90).2,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::loan::fixtures::loan;
    use crate::portfolio::{LoanClass, Snapshot};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, 28).unwrap()
    }

    #[test]
    fn test_empty_history_has_no_points() {
        let trend = calculate_kri_trend(&HistoricalSeries::default()).unwrap();
        assert!(trend.is_empty());
    }

    #[test]
    fn test_single_snapshot() {
        let history = HistoricalSeries::new(vec![Snapshot {
            snapshot_date: date(6),
            loans: vec![
                loan("A", dec!(100), LoanClass::Class1, 0),
                loan("B", dec!(100), LoanClass::Class2, 45),
                loan("C", dec!(200), LoanClass::Class1, 120),
            ],
        }]);
        let trend = calculate_kri_trend(&history).unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].snapshot_date, date(6));
        // C is 120 DPD but still Class1
        assert_eq!(trend[0].npl_ratio, Decimal::ZERO);
        assert_eq!(trend[0].par30_ratio, dec!(75));
        assert_eq!(trend[0].par90_ratio, dec!(50));
    }

    #[test]
    fn test_points_sorted_by_date_and_same_dates_merged() {
        let history = HistoricalSeries::new(vec![
            Snapshot {
                snapshot_date: date(5),
                loans: vec![loan("A", dec!(300), LoanClass::Class1, 0)],
            },
            Snapshot {
                snapshot_date: date(3),
                loans: vec![loan("A", dec!(100), LoanClass::Class5, 200)],
            },
            Snapshot {
                snapshot_date: date(5),
                loans: vec![loan("B", dec!(100), LoanClass::Class4, 95)],
            },
            Snapshot {
                snapshot_date: date(4),
                loans: vec![loan("A", Decimal::ZERO, LoanClass::Class5, 200)],
            },
        ]);
        let trend = calculate_kri_trend(&history).unwrap();
        let dates: Vec<NaiveDate> = trend.iter().map(|p| p.snapshot_date).collect();
        assert_eq!(dates, vec![date(3), date(4), date(5)]);

        assert_eq!(trend[0].npl_ratio, dec!(100));
        // zero-balance snapshot
        assert_eq!(trend[1].npl_ratio, Decimal::ZERO);
        assert_eq!(trend[1].par90_ratio, Decimal::ZERO);
        assert_eq!(trend[2].npl_ratio, dec!(25));
        assert_eq!(trend[2].par90_ratio, dec!(25));
    }

    #[test]
    fn test_duplicate_loan_in_snapshot_is_rejected() {
        let history = HistoricalSeries::new(vec![Snapshot {
            snapshot_date: date(6),
            loans: vec![
                loan("A", dec!(1), LoanClass::Class1, 0),
                loan("A", dec!(1), LoanClass::Class1, 0),
            ],
        }]);
        assert!(calculate_kri_trend(&history).is_err());
    }
}
