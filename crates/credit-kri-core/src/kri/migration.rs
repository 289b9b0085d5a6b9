//! Classification migration between the two most recent snapshots.
//!
//! Loans are matched on `loan_id` (inner join: originations, payoffs and
//! write-offs are not migrations). Cell `[r][c]` is the percentage of loans
//! classified `r` in the previous snapshot that sit in `c` in the current
//! one, so every populated row sums to 100. Both axes are always the full
//! `ALL_CLASSES` in severity order; a class with no loans in the previous
//! snapshot is an all-zero row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::portfolio::loan::validate_loans;
use crate::portfolio::{HistoricalSeries, LoanClass, ALL_CLASSES};
use crate::types::{pct_of, Percent};
use crate::KriResult;

const N: usize = ALL_CLASSES.len();

/// Migration result, explicit about the insufficient-history case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationMatrix {
    Computed(MigrationTable),
    Unavailable {
        reason: String,
        snapshots_found: usize,
    },
}

impl MigrationMatrix {
    pub fn table(&self) -> Option<&MigrationTable> {
        match self {
            MigrationMatrix::Computed(table) => Some(table),
            MigrationMatrix::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MigrationMatrix::Computed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationTable {
    pub previous_snapshot: NaiveDate,
    pub current_snapshot: NaiveDate,
    /// Loans present in both snapshots.
    pub matched_loans: u64,
    /// Axis labels for rows (previous) and columns (current).
    pub classes: Vec<LoanClass>,
    /// Raw transition counts, row = previous class, column = current class.
    pub counts: Vec<Vec<u64>>,
    /// Row-normalised percentages.
    pub percentages: Vec<Vec<Percent>>,
    /// Share of matched loans that moved to a less severe class.
    pub upgrade_rate: Percent,
    /// Share of matched loans that moved to a more severe class.
    pub downgrade_rate: Percent,
    pub stable_rate: Percent,
}

impl MigrationTable {
    /// Percentages for loans that started in `from`.
    pub fn row(&self, from: LoanClass) -> &[Percent] {
        &self.percentages[from.index()]
    }

    pub fn cell(&self, from: LoanClass, to: LoanClass) -> Percent {
        self.percentages[from.index()][to.index()]
    }

    /// Number of matched loans that started in `from`.
    pub fn row_count(&self, from: LoanClass) -> u64 {
        self.counts[from.index()].iter().sum()
    }
}

pub fn calculate_migration_matrix(history: &HistoricalSeries) -> KriResult<MigrationMatrix> {
    let dates = history.snapshot_dates();
    let [.., previous, current] = dates.as_slice() else {
        tracing::debug!(snapshots = dates.len(), "migration matrix unavailable");
        return Ok(MigrationMatrix::Unavailable {
            reason: "at least two distinct snapshot dates are required".into(),
            snapshots_found: dates.len(),
        });
    };

    let previous_loans = history.loans_on(*previous);
    let current_loans = history.loans_on(*current);
    validate_loans(previous_loans.iter().copied(), &format!("snapshot {previous}"))?;
    validate_loans(current_loans.iter().copied(), &format!("snapshot {current}"))?;

    let current_class: HashMap<&str, LoanClass> = current_loans
        .iter()
        .map(|l| (l.loan_id.as_str(), l.loan_classification))
        .collect();

    let mut counts = [[0u64; N]; N];
    for loan in &previous_loans {
        if let Some(to) = current_class.get(loan.loan_id.as_str()) {
            counts[loan.loan_classification.index()][to.index()] += 1;
        }
    }

    let table = build_table(*previous, *current, counts);
    tracing::debug!(
        previous = %previous,
        current = %current,
        matched = table.matched_loans,
        "migration matrix computed"
    );
    Ok(MigrationMatrix::Computed(table))
}

fn build_table(previous: NaiveDate, current: NaiveDate, counts: [[u64; N]; N]) -> MigrationTable {
    let mut matched = 0u64;
    let (mut upgrades, mut downgrades, mut stable) = (0u64, 0u64, 0u64);
    for (r, row) in counts.iter().enumerate() {
        for (c, &n) in row.iter().enumerate() {
            matched += n;
            match c.cmp(&r) {
                std::cmp::Ordering::Less => upgrades += n,
                std::cmp::Ordering::Greater => downgrades += n,
                std::cmp::Ordering::Equal => stable += n,
            }
        }
    }

    let percentages = counts
        .iter()
        .map(|row| {
            let row_total = Decimal::from(row.iter().sum::<u64>());
            row.iter()
                .map(|&n| pct_of(Decimal::from(n), row_total))
                .collect()
        })
        .collect();
    let share = |n: u64| pct_of(Decimal::from(n), Decimal::from(matched));

    MigrationTable {
        previous_snapshot: previous,
        current_snapshot: current,
        matched_loans: matched,
        classes: ALL_CLASSES.to_vec(),
        counts: counts.iter().map(|row| row.to_vec()).collect(),
        percentages,
        upgrade_rate: share(upgrades),
        downgrade_rate: share(downgrades),
        stable_rate: share(stable),
    }
}
