use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::{group_by, Dimension};
use crate::portfolio::LoanRecord;
use crate::types::{Money, Percent};

/// Profitability and risk side by side for one customer segment. NPL here
/// means classified Class4/Class5; delinquency shows in `par30_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPerformance {
    pub customer_segment: String,
    pub total_loans: u64,
    pub total_balance: Money,
    pub avg_loan_size: Money,
    pub avg_interest_rate: Percent,
    pub npl_count: u64,
    pub npl_ratio: Percent,
    pub par30_ratio: Percent,
    pub avg_dpd: Decimal,
    pub avg_months_on_book: Decimal,
}

pub fn calculate_segment_performance(loans: &[LoanRecord]) -> Vec<SegmentPerformance> {
    group_by(loans, Dimension::Segment)
        .into_iter()
        .map(|(customer_segment, acc)| SegmentPerformance {
            customer_segment,
            total_loans: acc.count,
            total_balance: acc.balance,
            avg_loan_size: acc.avg_balance(),
            avg_interest_rate: acc.avg_interest_rate(),
            npl_count: acc.classified_npl_count,
            npl_ratio: acc.classified_npl_ratio(),
            par30_ratio: acc.par(30).2,
            avg_dpd: acc.avg_dpd(),
            avg_months_on_book: acc.avg_months_on_book(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::loan::fixtures::loan;
    use crate::portfolio::LoanClass;
    use rust_decimal_macros::dec;

    #[test]
    fn test_segment_row() {
        let mut a = loan("A", dec!(100), LoanClass::Class1, 0);
        a.interest_rate = dec!(10);
        a.months_on_book = dec!(4);
        let mut b = loan("B", dec!(300), LoanClass::Class3, 40);
        b.interest_rate = dec!(14);
        b.months_on_book = dec!(20);
        let mut other = loan("C", dec!(50), LoanClass::Class1, 0);
        other.customer_segment = "NTB".into();

        let rows = calculate_segment_performance(&[a, b, other]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer_segment, "NTB");
        let prime = &rows[1];
        assert_eq!(prime.total_loans, 2);
        assert_eq!(prime.avg_loan_size, dec!(200));
        assert_eq!(prime.avg_interest_rate, dec!(12));
        assert_eq!(prime.npl_ratio, Decimal::ZERO);
        assert_eq!(prime.par30_ratio, dec!(75));
        assert_eq!(prime.avg_dpd, dec!(20));
        assert_eq!(prime.avg_months_on_book, dec!(12));
    }

    #[test]
    fn test_dpd_only_loan_is_not_counted_as_npl() {
        let mut sme = loan("B", dec!(100), LoanClass::Class1, 120);
        sme.customer_segment = "SME".into();
        let prime = loan("A", dec!(100), LoanClass::Class1, 0);
        let rows = calculate_segment_performance(&[prime, sme]);
        let sme = rows.iter().find(|r| r.customer_segment == "SME").unwrap();
        assert_eq!(sme.npl_count, 0);
        assert_eq!(sme.npl_ratio, Decimal::ZERO);
        assert_eq!(sme.par30_ratio, dec!(100));

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["customer_segment"], "Prime");
    }
}
