//! KRI calculations. Each submodule computes one group of the result tree
//! from the same loan slice; none depends on another's output.

pub mod aggregation;
pub mod concentration;
pub mod early_warning;
pub mod migration;
pub mod npl;
pub mod par;
pub mod quality;
pub mod segment;
pub mod trend;
pub mod vintage;

use serde::{Deserialize, Serialize};

use crate::types::Percent;

pub use concentration::{ConcentrationLevel, ConcentrationRisk};
pub use early_warning::EarlyWarning;
pub use migration::{MigrationMatrix, MigrationTable};
pub use npl::NplMetrics;
pub use par::ParMetrics;
pub use quality::QualityRow;
pub use segment::SegmentPerformance;
pub use trend::TrendPoint;
pub use vintage::VintageRow;

/// The full set of portfolio KRIs. Field names are the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KriReport {
    pub npl_metrics: NplMetrics,
    pub par_metrics: ParMetrics,
    pub quality_distribution: Vec<QualityRow>,
    pub concentration_risk: ConcentrationRisk,
    pub vintage_analysis: Vec<VintageRow>,
    pub segment_performance: Vec<SegmentPerformance>,
    pub early_warning: EarlyWarning,
}

/// A metric at or above its risk-appetite limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAppetiteBreach {
    pub metric: String,
    pub value: Percent,
    pub limit: Percent,
}

impl RiskAppetiteBreach {
    pub fn describe(&self) -> String {
        format!(
            "{} of {}% breaches the {}% risk-appetite limit",
            self.metric,
            self.value.round_dp(2),
            self.limit
        )
    }
}

impl KriReport {
    /// Every limit comparison that failed, in report order.
    pub fn breaches(&self) -> Vec<RiskAppetiteBreach> {
        let npl = &self.npl_metrics;
        let par = &self.par_metrics;
        let conc = &self.concentration_risk;
        let checks = [
            (
                "npl_ratio",
                npl.npl_balance_ratio,
                npl.risk_appetite_limit,
                npl.within_risk_appetite,
            ),
            bucket_check("par30_ratio", &par.par30),
            bucket_check("par90_ratio", &par.par90),
            (
                "top_industry_share",
                conc.industry.top_industry,
                conc.industry.profile.risk_appetite_limit,
                conc.industry.profile.within_risk_appetite,
            ),
            (
                "top_province_share",
                conc.province.top_province,
                conc.province.profile.risk_appetite_limit,
                conc.province.profile.within_risk_appetite,
            ),
            (
                "largest_exposure_share",
                conc.largest_exposure.share_pct,
                conc.largest_exposure.risk_appetite_limit,
                conc.largest_exposure.within_risk_appetite,
            ),
        ];
        checks
            .into_iter()
            .filter(|(_, _, _, within)| !within)
            .map(|(metric, value, limit, _)| RiskAppetiteBreach {
                metric: metric.to_string(),
                value,
                limit,
            })
            .collect()
    }
}

/// Metric name, value, limit, within limit.
type LimitCheck = (&'static str, Percent, Percent, bool);

fn bucket_check(name: &'static str, bucket: &par::ParBucket) -> LimitCheck {
    (
        name,
        bucket.ratio,
        bucket.risk_appetite_limit.unwrap_or_default(),
        bucket.within_risk_appetite.unwrap_or(true),
    )
}
