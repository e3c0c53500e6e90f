//! Method 2: alpha-channel IQR analysis.
//!
//! Opaque-ratio outliers mark frames where the matte either ate into the
//! subject (transparency hole) or left background behind (extra opacity).
//! A separate semi-transparent check catches fringing halos.

use crate::analyze::FrameAnalysis;
use crate::consts::SEVERE_HALO_MARGIN;
use crate::stats::ReferenceStats;

use super::{Anomaly, AnomalyKind, AnomalyMap, DetectionConfig, Severity};

/// Flag opacity outliers and halo frames.
pub fn detect(
    analyses: &[FrameAnalysis],
    stats: &ReferenceStats,
    config: &DetectionConfig,
) -> AnomalyMap {
    let mut map = AnomalyMap::new();

    let q = stats.opacity_quartiles;
    let iqr = q.iqr();
    let lower = q.q1 - config.opacity_iqr_multiplier * iqr;
    let upper = q.q3 + config.opacity_iqr_multiplier * iqr;
    let semi_q3 = stats.semi_trans_quartiles.q3;

    for analysis in analyses {
        let opaque = analysis.alpha_ratios.opaque;

        if opaque < lower {
            // One extra IQR beyond the bound escalates to severe.
            let severity = if lower - opaque > iqr {
                Severity::Severe
            } else {
                Severity::Moderate
            };
            map.entry(analysis.index).or_default().push(Anomaly {
                severity,
                kind: AnomalyKind::TransparencyHole {
                    opaque_ratio: opaque,
                    lower_bound: lower,
                },
            });
        } else if opaque > upper {
            let severity = if opaque - upper > iqr {
                Severity::Severe
            } else {
                Severity::Moderate
            };
            map.entry(analysis.index).or_default().push(Anomaly {
                severity,
                kind: AnomalyKind::ExtraOpacity {
                    opaque_ratio: opaque,
                    upper_bound: upper,
                },
            });
        }

        let semi = analysis.alpha_ratios.semi_transparent;
        if semi > semi_q3 + config.halo_margin {
            let severity = if semi > semi_q3 + SEVERE_HALO_MARGIN {
                Severity::Severe
            } else {
                Severity::Moderate
            };
            map.entry(analysis.index).or_default().push(Anomaly {
                severity,
                kind: AnomalyKind::HaloEffect {
                    semi_transparent_ratio: semi,
                    q3: semi_q3,
                },
            });
        }
    }

    map
}
