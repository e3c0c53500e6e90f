//! Multi-method anomaly detection.
//!
//! Four independent passes each produce an [`AnomalyMap`]; the maps are
//! merged additively by index. Passes never see each other's records except
//! that the pixel-difference pass skips frames already flagged for
//! structural damage, to avoid double-counting the same defect.

pub mod alpha;
pub mod config;
pub mod histogram;
pub mod pixel_diff;
pub mod ssim;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::analyze::FrameAnalysis;
use crate::consts::MIN_DETECTION_FRAMES;
use crate::error::Result;
use crate::frame::RawPixelBuffer;
use crate::stats::ReferenceStats;

pub use config::DetectionConfig;

/// How strongly a single detection method believes the frame is damaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Moderate,
    Severe,
}

/// One detection record attached to a frame index.
#[derive(Clone, Debug, Serialize)]
pub struct Anomaly {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

/// Method-specific anomaly payload.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A color bucket collapsed relative to its cross-frame median.
    ColorLoss { bucket: String, ratio: f64 },
    /// The designated primary bucket alone collapsed.
    PrimaryColorLoss { bucket: String, ratio: f64 },
    /// Opaque ratio fell below the IQR lower bound.
    TransparencyHole { opaque_ratio: f64, lower_bound: f64 },
    /// Opaque ratio rose above the IQR upper bound.
    ExtraOpacity { opaque_ratio: f64, upper_bound: f64 },
    /// Semi-transparent ratio exceeded Q3 by more than the halo margin.
    HaloEffect { semi_transparent_ratio: f64, q3: f64 },
    /// Both adjacent SSIM scores fell below the strict outlier floor.
    StructuralDamage {
        prev_score: f64,
        next_score: f64,
        outlier_threshold: f64,
    },
    /// Mean adjacent pixel-difference ratio exceeded the outlier bound.
    PixelOutlier { mean_adjacent_diff: f64, bound: f64 },
}

impl AnomalyKind {
    /// Report label of the anomaly type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ColorLoss { .. } => "color_loss",
            Self::PrimaryColorLoss { .. } => "primary_color_loss",
            Self::TransparencyHole { .. } => "transparency_hole",
            Self::ExtraOpacity { .. } => "extra_opacity",
            Self::HaloEffect { .. } => "halo_effect",
            Self::StructuralDamage { .. } => "structural_damage",
            Self::PixelOutlier { .. } => "pixel_outlier",
        }
    }
}

/// Anomalies keyed by frame index.
pub type AnomalyMap = BTreeMap<usize, Vec<Anomaly>>;

/// Report labels of the four detection methods, in pass order.
pub const DETECTION_METHODS: [&str; 4] = [
    "color_histogram",
    "alpha_iqr",
    "structural_similarity",
    "pixel_difference",
];

/// Merge per-method anomaly maps additively. Records are appended per index,
/// never overwritten, so the merge is a pure fold over independent passes.
pub fn merge_anomalies<I>(maps: I) -> AnomalyMap
where
    I: IntoIterator<Item = AnomalyMap>,
{
    maps.into_iter().fold(AnomalyMap::new(), |mut acc, map| {
        for (index, anomalies) in map {
            acc.entry(index).or_default().extend(anomalies);
        }
        acc
    })
}

/// Run all four detection passes and merge their findings.
///
/// Sequences shorter than [`MIN_DETECTION_FRAMES`] return an empty map:
/// detection is a no-op, stabilization and verification still run.
pub fn run_detection(
    frames: &[RawPixelBuffer],
    analyses: &[FrameAnalysis],
    stats: &ReferenceStats,
    primary_bucket: Option<&str>,
    config: &DetectionConfig,
) -> Result<AnomalyMap> {
    if frames.len() < MIN_DETECTION_FRAMES {
        debug!(
            frames = frames.len(),
            "Sequence too short for detection, skipping"
        );
        return Ok(AnomalyMap::new());
    }

    let histogram = histogram::detect(analyses, stats, primary_bucket, config);
    let alpha = alpha::detect(analyses, stats, config);

    // Both adjacent-pair passes run on the same padded normalization.
    let normalized = ssim::normalize_frames(frames)?;
    let structural = ssim::detect(&normalized, config);
    let flagged: BTreeSet<usize> = structural.keys().copied().collect();
    let pixel = pixel_diff::detect(&normalized, &flagged, config)?;

    let merged = merge_anomalies([histogram, alpha, structural, pixel]);
    info!(
        bad_frames = merged.len(),
        total = frames.len(),
        "Detection complete"
    );
    Ok(merged)
}
