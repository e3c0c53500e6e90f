//! Cross-frame reference statistics.
//!
//! Medians and quartiles use nearest-rank (floor-index) selection on the
//! sorted values, never linear interpolation. Detection thresholds are
//! derived from these values, so the selection rule must stay exact.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyze::FrameAnalysis;

/// First and third quartile of a sample.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Per-run reference statistics derived from all frame analyses.
#[derive(Clone, Debug, Serialize)]
pub struct ReferenceStats {
    /// Nearest-rank median pixel count per bucket label.
    pub bucket_medians: BTreeMap<String, f64>,
    /// Quartiles of the per-frame opaque-pixel ratio.
    pub opacity_quartiles: Quartiles,
    /// Quartiles of the per-frame semi-transparent-pixel ratio.
    pub semi_trans_quartiles: Quartiles,
}

/// Nearest-rank median: `sorted[n / 2]`.
pub fn nearest_rank_median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    values[values.len() / 2]
}

/// Nearest-rank quartiles: `sorted[floor(n * 0.25)]` and
/// `sorted[floor(n * 0.75)]`.
pub fn nearest_rank_quartiles(values: &mut [f64]) -> Quartiles {
    if values.is_empty() {
        return Quartiles::default();
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let n = values.len();
    Quartiles {
        q1: values[n / 4],
        q3: values[n * 3 / 4],
    }
}

/// Fold all frame analyses into reference statistics.
pub fn aggregate(analyses: &[FrameAnalysis]) -> ReferenceStats {
    let mut per_bucket: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for analysis in analyses {
        for (label, &count) in &analysis.bucket_counts {
            per_bucket
                .entry(label.as_str())
                .or_default()
                .push(count as f64);
        }
    }

    let bucket_medians = per_bucket
        .into_iter()
        .map(|(label, mut counts)| (label.to_string(), nearest_rank_median(&mut counts)))
        .collect();

    let mut opacity: Vec<f64> = analyses.iter().map(|a| a.alpha_ratios.opaque).collect();
    let mut semi: Vec<f64> = analyses
        .iter()
        .map(|a| a.alpha_ratios.semi_transparent)
        .collect();

    ReferenceStats {
        bucket_medians,
        opacity_quartiles: nearest_rank_quartiles(&mut opacity),
        semi_trans_quartiles: nearest_rank_quartiles(&mut semi),
    }
}
