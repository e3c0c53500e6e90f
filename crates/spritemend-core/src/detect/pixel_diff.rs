//! Method 4: pixel-difference outlier.
//!
//! A coarse safety net under the SSIM pass: frames whose average difference
//! against both neighbors blows past the median-scaled bound are flagged,
//! unless the structural pass already claimed them.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::codec;
use crate::error::Result;
use crate::frame::RawPixelBuffer;
use crate::stats::nearest_rank_median;

use super::{Anomaly, AnomalyKind, AnomalyMap, DetectionConfig, Severity};

/// Normalized difference ratios for every adjacent pair of already-normalized
/// frames.
pub fn adjacent_diff_ratios(
    normalized: &[RawPixelBuffer],
    tolerance: f64,
) -> Result<Vec<f64>> {
    (0..normalized.len().saturating_sub(1))
        .into_par_iter()
        .map(|i| {
            let a = &normalized[i];
            let diff = codec::pixel_diff(a, &normalized[i + 1], tolerance)?;
            Ok(diff as f64 / a.pixel_count() as f64)
        })
        .collect()
}

/// Flag interior frames whose adjacent diffs exceed the outlier bound.
///
/// Both adjacent diffs must cross the bound, the same double confirmation
/// the structural pass uses: a broken frame differs wildly from both
/// neighbors, while a frame with one wild edge is merely sitting next to a
/// broken one and must stay available as a substitute.
///
/// `structural` holds indices already flagged by the SSIM pass; those are
/// skipped so the same defect is not reported twice.
pub fn detect(
    normalized: &[RawPixelBuffer],
    structural: &BTreeSet<usize>,
    config: &DetectionConfig,
) -> Result<AnomalyMap> {
    let mut map = AnomalyMap::new();
    let diffs = adjacent_diff_ratios(normalized, config.pixel_diff_tolerance)?;
    if diffs.len() < 2 {
        return Ok(map);
    }

    let mut sorted = diffs.clone();
    let median = nearest_rank_median(&mut sorted);
    let bound = (config.pixel_diff_outlier_multiplier * median).max(config.pixel_diff_threshold);

    for i in 1..normalized.len() - 1 {
        if structural.contains(&i) {
            continue;
        }
        let (prev, next) = (diffs[i - 1], diffs[i]);
        let mean = (prev + next) / 2.0;
        if prev > bound && next > bound {
            map.entry(i).or_default().push(Anomaly {
                severity: Severity::Moderate,
                kind: AnomalyKind::PixelOutlier {
                    mean_adjacent_diff: mean,
                    bound,
                },
            });
        }
    }

    Ok(map)
}
