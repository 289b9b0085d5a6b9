//! Early-warning signals.
//!
//! Three independent filters over the book; a loan can trip more than one.

use serde::{Deserialize, Serialize};

use super::aggregation::sum_where;
use crate::config::{EARLY_DELINQUENCY_MAX_DPD, EARLY_DELINQUENCY_MIN_DPD, NEW_LOAN_MONTHS};
use crate::portfolio::LoanRecord;
use crate::types::{pct_of, Money, Percent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningSignal {
    pub count: u64,
    pub balance: Money,
    /// Share of total portfolio balance.
    pub ratio: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    /// 1 to 29 days past due.
    pub early_delinquency: WarningSignal,
    /// Classified Class2, whatever the DPD.
    pub watch_list: WarningSignal,
    /// Under six months on book and already past due.
    pub new_loans_issues: WarningSignal,
}

pub fn calculate_early_warning(loans: &[LoanRecord]) -> EarlyWarning {
    let total: Money = loans.iter().map(|l| l.outstanding_balance).sum();

    EarlyWarning {
        early_delinquency: signal(loans, total, |l| {
            (EARLY_DELINQUENCY_MIN_DPD..=EARLY_DELINQUENCY_MAX_DPD).contains(&l.days_past_due)
        }),
        watch_list: signal(loans, total, |l| l.loan_classification.is_watch_list()),
        new_loans_issues: signal(loans, total, |l| {
            l.months_on_book < NEW_LOAN_MONTHS && l.days_past_due > 0
        }),
    }
}

fn signal<F>(loans: &[LoanRecord], total: Money, pred: F) -> WarningSignal
where
    F: Fn(&LoanRecord) -> bool,
{
    let (balance, count) = sum_where(loans, pred);
    WarningSignal {
        count,
        balance,
        ratio: pct_of(balance, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::loan::fixtures::loan;
    use crate::portfolio::LoanClass;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signals_overlap() {
        // New, 15 DPD, Class2: counts in all three buckets.
        let mut a = loan("A", dec!(100), LoanClass::Class2, 15);
        a.months_on_book = dec!(3);
        let b = loan("B", dec!(300), LoanClass::Class1, 30);
        let c = loan("C", dec!(600), LoanClass::Class1, 0);
        let ew = calculate_early_warning(&[a, b, c]);

        assert_eq!(ew.early_delinquency.count, 1);
        assert_eq!(ew.early_delinquency.ratio, dec!(10));
        assert_eq!(ew.watch_list.count, 1);
        assert_eq!(ew.watch_list.balance, dec!(100));
        assert_eq!(ew.new_loans_issues.count, 1);
    }

    #[test]
    fn test_window_edges() {
        let mut old = loan("A", dec!(100), LoanClass::Class1, 29);
        old.months_on_book = dec!(6);
        let current = loan("B", dec!(100), LoanClass::Class1, 0);
        let ew = calculate_early_warning(&[old, current]);
        assert_eq!(ew.early_delinquency.count, 1);
        assert_eq!(ew.new_loans_issues.count, 0);
        assert_eq!(ew.watch_list.ratio, Decimal::ZERO);
    }

    #[test]
    fn test_watch_list_ignores_dpd() {
        let l = loan("A", dec!(100), LoanClass::Class2, 0);
        let ew = calculate_early_warning(&[l]);
        assert_eq!(ew.watch_list.count, 1);
        assert_eq!(ew.watch_list.ratio, dec!(100));
        assert_eq!(ew.early_delinquency.count, 0);
    }
}
