//! Method 1: color-histogram loss.
//!
//! A frame whose count in a well-populated bucket drops far below the
//! cross-frame median has lost part of the subject's palette, usually to an
//! over-aggressive background matte.

use crate::analyze::FrameAnalysis;
use crate::consts::SEVERE_COLOR_RATIO;
use crate::stats::ReferenceStats;

use super::{Anomaly, AnomalyKind, AnomalyMap, DetectionConfig, Severity};

/// Flag frames whose bucket counts collapse relative to the median.
///
/// Only buckets whose median exceeds the presence floor are checked. The
/// designated primary bucket gets the more specific record instead of a
/// second generic one for the same bucket.
pub fn detect(
    analyses: &[FrameAnalysis],
    stats: &ReferenceStats,
    primary_bucket: Option<&str>,
    config: &DetectionConfig,
) -> AnomalyMap {
    let mut map = AnomalyMap::new();

    for analysis in analyses {
        for (label, &count) in &analysis.bucket_counts {
            let Some(&median) = stats.bucket_medians.get(label) else {
                continue;
            };
            if median <= config.bucket_presence_floor {
                continue;
            }

            let ratio = count as f64 / median;
            if ratio >= config.color_ratio_threshold {
                continue;
            }

            let severity = if ratio < SEVERE_COLOR_RATIO {
                Severity::Severe
            } else {
                Severity::Moderate
            };

            let is_primary =
                primary_bucket == Some(label.as_str()) && median > config.primary_presence_floor;
            let kind = if is_primary {
                AnomalyKind::PrimaryColorLoss {
                    bucket: label.clone(),
                    ratio,
                }
            } else {
                AnomalyKind::ColorLoss {
                    bucket: label.clone(),
                    ratio,
                }
            };

            map.entry(analysis.index)
                .or_default()
                .push(Anomaly { severity, kind });
        }
    }

    map
}
