//! Per-frame pixel analysis: color-bucket classification and alpha-category
//! ratios. Pure functions of the decoded buffer, no side effects.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    ALPHA_OPAQUE_MIN, ALPHA_TRANSPARENT_MAX, BUCKET_ALPHA_THRESHOLD, LUMINANCE_B, LUMINANCE_G,
    LUMINANCE_R, OTHER_BUCKET, PARALLEL_FRAME_THRESHOLD,
};
use crate::error::{Result, SpriteMendError};
use crate::frame::RawPixelBuffer;

/// Predicate deciding whether an (r, g, b) sample belongs to a bucket.
///
/// Bucket definitions are calibration data for a specific art style, supplied
/// by the caller; there is no built-in palette.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketPredicate {
    /// Inclusive per-channel ranges.
    RgbRange { r: [u8; 2], g: [u8; 2], b: [u8; 2] },
    /// Channel spread (max - min) at most `max_spread`: grays and near-grays.
    NearGray { max_spread: u8 },
    /// BT.601 luminance within the inclusive range.
    LumaRange { min: u8, max: u8 },
}

impl BucketPredicate {
    pub fn matches(&self, r: u8, g: u8, b: u8) -> bool {
        match self {
            Self::RgbRange { r: rr, g: gr, b: br } => {
                (rr[0]..=rr[1]).contains(&r)
                    && (gr[0]..=gr[1]).contains(&g)
                    && (br[0]..=br[1]).contains(&b)
            }
            Self::NearGray { max_spread } => {
                let max = r.max(g).max(b);
                let min = r.min(g).min(b);
                max - min <= *max_spread
            }
            Self::LumaRange { min, max } => {
                let luma = (LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32)
                    .round() as u8;
                (*min..=*max).contains(&luma)
            }
        }
    }
}

/// One ordered classification rule. The first rule whose predicate matches
/// wins; pixels matching no rule fall into the reserved `other` bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BucketRule {
    pub label: String,
    pub predicate: BucketPredicate,
}

/// The full bucket calibration for one art style.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Label of the dominant subject bucket, if one is designated. Gets a
    /// more specific anomaly type when it alone collapses.
    #[serde(default)]
    pub primary: Option<String>,
    /// Ordered classification rules.
    #[serde(default)]
    pub rules: Vec<BucketRule>,
}

impl BucketConfig {
    /// Check label uniqueness, the reserved `other` label, and that the
    /// primary label (if set) names an actual rule.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for rule in &self.rules {
            if rule.label == OTHER_BUCKET {
                return Err(SpriteMendError::Config(format!(
                    "bucket label '{OTHER_BUCKET}' is reserved for unmatched pixels"
                )));
            }
            if !seen.insert(rule.label.as_str()) {
                return Err(SpriteMendError::Config(format!(
                    "duplicate bucket label '{}'",
                    rule.label
                )));
            }
        }
        if let Some(primary) = &self.primary {
            if !seen.contains(primary.as_str()) {
                return Err(SpriteMendError::Config(format!(
                    "primary bucket '{primary}' has no matching rule"
                )));
            }
        }
        Ok(())
    }
}

/// Fractions of all pixels in each alpha category.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct AlphaRatios {
    pub opaque: f64,
    pub semi_transparent: f64,
    pub transparent: f64,
}

/// Derived statistics of one decoded frame.
#[derive(Clone, Debug, Serialize)]
pub struct FrameAnalysis {
    pub index: usize,
    pub bucket_counts: BTreeMap<String, u64>,
    pub alpha_ratios: AlphaRatios,
}

/// Analyze a single frame.
///
/// Pixels with alpha above the opaque threshold are classified into exactly
/// one bucket (first matching rule wins). Alpha-category ratios are computed
/// over all pixels, normalized by total pixel count.
pub fn analyze_frame(index: usize, buf: &RawPixelBuffer, buckets: &BucketConfig) -> FrameAnalysis {
    let mut counts: BTreeMap<String, u64> = buckets
        .rules
        .iter()
        .map(|r| (r.label.clone(), 0u64))
        .collect();
    counts.insert(OTHER_BUCKET.to_string(), 0);

    let mut opaque = 0u64;
    let mut semi = 0u64;
    let mut transparent = 0u64;

    for px in buf.data.chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);

        if a > ALPHA_OPAQUE_MIN {
            opaque += 1;
        } else if a > ALPHA_TRANSPARENT_MAX {
            semi += 1;
        } else {
            transparent += 1;
        }

        if a > BUCKET_ALPHA_THRESHOLD {
            let label = buckets
                .rules
                .iter()
                .find(|rule| rule.predicate.matches(r, g, b))
                .map(|rule| rule.label.as_str())
                .unwrap_or(OTHER_BUCKET);
            *counts.get_mut(label).unwrap() += 1;
        }
    }

    let total = buf.pixel_count() as f64;
    FrameAnalysis {
        index,
        bucket_counts: counts,
        alpha_ratios: AlphaRatios {
            opaque: opaque as f64 / total,
            semi_transparent: semi as f64 / total,
            transparent: transparent as f64 / total,
        },
    }
}

/// Analyze all frames, in parallel for longer sequences.
pub fn analyze_frames(frames: &[RawPixelBuffer], buckets: &BucketConfig) -> Vec<FrameAnalysis> {
    if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames
            .par_iter()
            .enumerate()
            .map(|(i, buf)| analyze_frame(i, buf, buckets))
            .collect()
    } else {
        frames
            .iter()
            .enumerate()
            .map(|(i, buf)| analyze_frame(i, buf, buckets))
            .collect()
    }
}
