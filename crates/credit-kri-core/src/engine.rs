//! The metrics engine.
//!
//! Holds the risk-appetite limits fixed at construction and nothing else, so
//! one engine can be shared freely. Every entry point borrows its input
//! immutably and returns a fresh value.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::RiskAppetite;
use crate::kri::concentration::{self, ConcentrationRisk};
use crate::kri::early_warning::{self, EarlyWarning};
use crate::kri::migration::{self, MigrationMatrix};
use crate::kri::npl::{self, NplMetrics};
use crate::kri::par::{self, ParMetrics};
use crate::kri::quality::{self, QualityRow};
use crate::kri::segment::{self, SegmentPerformance};
use crate::kri::trend::{self, TrendPoint};
use crate::kri::vintage::{self, VintageRow};
use crate::kri::KriReport;
use crate::portfolio::loan::{data_quality_notes, validate_loans};
use crate::portfolio::{HistoricalSeries, Portfolio};
use crate::types::{with_metadata, ComputationOutput};
use crate::KriResult;

#[derive(Debug, Clone, Default)]
pub struct KriEngine {
    appetite: RiskAppetite,
}

/// Report payload: the KRI tree plus, when history was supplied, the
/// migration matrix and the per-date trend under their own keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KriReportOutput {
    #[serde(flatten)]
    pub kris: KriReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_matrix: Option<MigrationMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kri_trend: Option<Vec<TrendPoint>>,
}

impl KriEngine {
    pub fn new(appetite: RiskAppetite) -> KriResult<Self> {
        appetite.validate()?;
        Ok(Self { appetite })
    }

    pub fn risk_appetite(&self) -> &RiskAppetite {
        &self.appetite
    }

    /// Compute every KRI group for the current book.
    pub fn calculate_all_kris(&self, portfolio: &Portfolio) -> KriResult<KriReport> {
        validate_loans(&portfolio.loans, "portfolio")?;
        let loans = portfolio.loans.as_slice();
        tracing::debug!(loans = loans.len(), "calculating KRIs");

        let report = KriReport {
            npl_metrics: npl::calculate_npl_metrics(loans, &self.appetite),
            par_metrics: par::calculate_par_metrics(loans, &self.appetite),
            quality_distribution: quality::calculate_quality_distribution(loans),
            concentration_risk: concentration::calculate_concentration_risk(
                loans,
                &self.appetite,
            ),
            vintage_analysis: vintage::calculate_vintage_analysis(loans),
            segment_performance: segment::calculate_segment_performance(loans),
            early_warning: early_warning::calculate_early_warning(loans),
        };

        for breach in report.breaches() {
            tracing::warn!(
                metric = %breach.metric,
                value = %breach.value,
                limit = %breach.limit,
                "risk appetite breached"
            );
        }
        Ok(report)
    }

    pub fn calculate_npl_metrics(&self, portfolio: &Portfolio) -> KriResult<NplMetrics> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(npl::calculate_npl_metrics(&portfolio.loans, &self.appetite))
    }

    pub fn calculate_par_metrics(&self, portfolio: &Portfolio) -> KriResult<ParMetrics> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(par::calculate_par_metrics(&portfolio.loans, &self.appetite))
    }

    pub fn calculate_quality_distribution(
        &self,
        portfolio: &Portfolio,
    ) -> KriResult<Vec<QualityRow>> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(quality::calculate_quality_distribution(&portfolio.loans))
    }

    pub fn calculate_concentration_risk(
        &self,
        portfolio: &Portfolio,
    ) -> KriResult<ConcentrationRisk> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(concentration::calculate_concentration_risk(
            &portfolio.loans,
            &self.appetite,
        ))
    }

    pub fn calculate_vintage_analysis(&self, portfolio: &Portfolio) -> KriResult<Vec<VintageRow>> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(vintage::calculate_vintage_analysis(&portfolio.loans))
    }

    pub fn calculate_segment_performance(
        &self,
        portfolio: &Portfolio,
    ) -> KriResult<Vec<SegmentPerformance>> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(segment::calculate_segment_performance(&portfolio.loans))
    }

    pub fn calculate_early_warning(&self, portfolio: &Portfolio) -> KriResult<EarlyWarning> {
        validate_loans(&portfolio.loans, "portfolio")?;
        Ok(early_warning::calculate_early_warning(&portfolio.loans))
    }

    /// Migration between the two latest snapshots; `Unavailable` when the
    /// series has fewer than two distinct dates.
    pub fn calculate_migration_matrix(
        &self,
        history: &HistoricalSeries,
    ) -> KriResult<MigrationMatrix> {
        migration::calculate_migration_matrix(history)
    }

    /// NPL, PAR30 and PAR90 ratios for each snapshot date, oldest first.
    pub fn calculate_kri_trend(&self, history: &HistoricalSeries) -> KriResult<Vec<TrendPoint>> {
        let points = trend::calculate_kri_trend(history)?;
        tracing::debug!(points = points.len(), "calculated KRI trend");
        Ok(points)
    }

    /// Full report in the standard computation envelope. Breaches and
    /// data-quality notes are listed as warnings.
    pub fn generate_report(
        &self,
        portfolio: &Portfolio,
        history: Option<&HistoricalSeries>,
    ) -> KriResult<ComputationOutput<KriReportOutput>> {
        let start = Instant::now();
        tracing::info!(loans = portfolio.len(), "generating KRI report");

        let kris = self.calculate_all_kris(portfolio)?;
        let migration_matrix = history
            .map(|h| self.calculate_migration_matrix(h))
            .transpose()?;
        let kri_trend = history.map(|h| self.calculate_kri_trend(h)).transpose()?;

        let mut warnings: Vec<String> = kris.breaches().iter().map(|b| b.describe()).collect();
        warnings.extend(data_quality_notes(&portfolio.loans));
        if let Some(MigrationMatrix::Unavailable { reason, .. }) = &migration_matrix {
            warnings.push(format!("Migration matrix unavailable: {reason}"));
        }

        let output = KriReportOutput {
            kris,
            migration_matrix,
            kri_trend,
        };
        let elapsed = start.elapsed().as_micros() as u64;

        Ok(with_metadata(
            "Credit risk KRIs: NPL (Class4/5 or 90+ DPD), PAR buckets, HHI concentration, \
             vintage and segment breakdowns, early-warning signals",
            &self.appetite,
            warnings,
            elapsed,
            output,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::loan::fixtures::loan;
    use crate::portfolio::LoanClass;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn book() -> Portfolio {
        Portfolio::new(vec![
            loan("A", dec!(100), LoanClass::Class1, 0),
            loan("B", dec!(300), LoanClass::Class5, 200),
        ])
    }

    #[test]
    fn test_rejects_invalid_appetite() {
        let appetite = RiskAppetite {
            npl_ratio_max: dec!(-1),
            ..RiskAppetite::default()
        };
        assert!(KriEngine::new(appetite).is_err());
    }

    #[test]
    fn test_report_has_contract_keys() {
        let report = KriEngine::default().calculate_all_kris(&book()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        for key in [
            "npl_metrics",
            "par_metrics",
            "quality_distribution",
            "concentration_risk",
            "vintage_analysis",
            "segment_performance",
            "early_warning",
        ] {
            assert!(keys.iter().any(|k| k.as_str() == key), "missing {key}");
        }
        assert_eq!(keys.len(), 7);
        assert!(json.get("migration_matrix").is_none());
        assert!(json.get("kri_trend").is_none());
    }

    #[test]
    fn test_breaches_listed() {
        let report = KriEngine::default().calculate_all_kris(&book()).unwrap();
        let metrics: Vec<String> = report.breaches().into_iter().map(|b| b.metric).collect();
        assert!(metrics.contains(&"npl_ratio".to_string()));
        assert!(metrics.contains(&"par30_ratio".to_string()));
        assert!(metrics.contains(&"par90_ratio".to_string()));
        assert!(metrics.contains(&"largest_exposure_share".to_string()));
    }

    #[test]
    fn test_rejects_duplicate_loans() {
        let portfolio = Portfolio::new(vec![
            loan("A", dec!(1), LoanClass::Class1, 0),
            loan("A", dec!(1), LoanClass::Class1, 0),
        ]);
        assert!(KriEngine::default().calculate_all_kris(&portfolio).is_err());
        assert!(KriEngine::default().calculate_par_metrics(&portfolio).is_err());
    }

    #[test]
    fn test_generate_report_with_short_history() {
        let history = HistoricalSeries::default();
        let out = KriEngine::default()
            .generate_report(&book(), Some(&history))
            .unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("unavailable")));
        assert!(out.warnings.iter().any(|w| w.contains("npl_ratio")));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["result"]["migration_matrix"]["status"], "unavailable");
        assert!(json["result"]["npl_metrics"].is_object());
        assert_eq!(json["result"]["kri_trend"], serde_json::json!([]));
        assert_eq!(json["assumptions"]["npl_ratio_max"], "3.0");
    }

    #[test]
    fn test_generate_report_includes_trend() {
        use crate::portfolio::Snapshot;
        use chrono::NaiveDate;

        let snap = |month, loans| Snapshot {
            snapshot_date: NaiveDate::from_ymd_opt(2025, month, 30).unwrap(),
            loans,
        };
        let history = HistoricalSeries::new(vec![
            snap(6, book().loans),
            snap(4, vec![loan("A", dec!(100), LoanClass::Class1, 0)]),
        ]);
        let out = KriEngine::default()
            .generate_report(&book(), Some(&history))
            .unwrap();
        let trend = out.result.kri_trend.unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].npl_ratio, Decimal::ZERO);
        assert_eq!(trend[1].npl_ratio, dec!(75));
        assert_eq!(trend[1].par90_ratio, dec!(75));
        assert!(out.result.migration_matrix.unwrap().is_available());

        let without = KriEngine::default().generate_report(&book(), None).unwrap();
        assert!(without.result.kri_trend.is_none());
    }
}
