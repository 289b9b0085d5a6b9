use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::{LoanClass, LoanRecord, ALL_CLASSES};
use crate::types::{pct_of, Money, Percent};

/// Count and balance held in one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRow {
    pub classification: LoanClass,
    pub count: u64,
    pub balance: Money,
    pub count_pct: Percent,
    pub balance_pct: Percent,
}

/// One row per class, always Class1 → Class5, including empty classes.
pub fn calculate_quality_distribution(loans: &[LoanRecord]) -> Vec<QualityRow> {
    let mut counts = [0u64; ALL_CLASSES.len()];
    let mut balances = [Decimal::ZERO; ALL_CLASSES.len()];
    for loan in loans {
        let i = loan.loan_classification.index();
        counts[i] += 1;
        balances[i] += loan.outstanding_balance;
    }
    let total_count = Decimal::from(counts.iter().sum::<u64>());
    let total_balance: Money = balances.iter().copied().sum();

    ALL_CLASSES
        .iter()
        .map(|&classification| {
            let i = classification.index();
            QualityRow {
                classification,
                count: counts[i],
                balance: balances[i],
                count_pct: pct_of(Decimal::from(counts[i]), total_count),
                balance_pct: pct_of(balances[i], total_balance),
            }
        })
        .collect()
}
