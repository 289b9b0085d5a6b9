//! Loan-level input model: records, the current book, and historical snapshots.

pub mod classification;
pub mod history;
pub mod loan;

use serde::{Deserialize, Serialize};

use crate::types::Money;

pub use classification::{LoanClass, ALL_CLASSES};
pub use history::{HistoricalSeries, Snapshot};
pub use loan::{months_between, vintage_key, LoanRecord};

/// The current view of the loan book. Order of loans is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub loans: Vec<LoanRecord>,
}

impl Portfolio {
    pub fn new(loans: Vec<LoanRecord>) -> Self {
        Self { loans }
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn total_balance(&self) -> Money {
        self.loans.iter().map(|l| l.outstanding_balance).sum()
    }

    /// Recompute derived fields of every loan as of `as_of`.
    pub fn refresh_derived(&mut self, as_of: chrono::NaiveDate) {
        for loan in &mut self.loans {
            loan.refresh_derived(as_of);
        }
    }
}

impl From<Vec<LoanRecord>> for Portfolio {
    fn from(loans: Vec<LoanRecord>) -> Self {
        Self::new(loans)
    }
}
