//! Method 3: adjacent-frame structural similarity.
//!
//! A simplified SSIM (luminance mean/variance/covariance) is computed for
//! every temporally adjacent pair, restricted to pixels where either frame
//! has meaningful alpha. An interior frame is flagged only when BOTH of its
//! adjacent scores fall below a strict Q1 - k*IQR floor and the worse of the
//! two is also below an absolute threshold. Normal motion blur depresses one
//! score, not both, so the double confirmation keeps false positives out.

use ndarray::Array2;
use rayon::prelude::*;

use crate::codec;
use crate::consts::{PARALLEL_FRAME_THRESHOLD, SSIM_ALPHA_FLOOR, SSIM_C1, SSIM_C2};
use crate::error::Result;
use crate::frame::RawPixelBuffer;
use crate::stats::nearest_rank_quartiles;

use super::{Anomaly, AnomalyKind, AnomalyMap, DetectionConfig, Severity};

/// Pad-normalize all frames to the sequence's maximum width and height.
pub fn normalize_frames(frames: &[RawPixelBuffer]) -> Result<Vec<RawPixelBuffer>> {
    let max_w = frames.iter().map(|f| f.width).max().unwrap_or(0);
    let max_h = frames.iter().map(|f| f.height).max().unwrap_or(0);

    if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames
            .par_iter()
            .map(|f| codec::resize_pad(f, max_w, max_h))
            .collect()
    } else {
        frames
            .iter()
            .map(|f| codec::resize_pad(f, max_w, max_h))
            .collect()
    }
}

/// Simplified SSIM over pixels where either frame has alpha above the floor.
///
/// Both buffers must share dimensions. An empty overlap mask (both frames
/// blank) scores 1.0.
pub fn ssim_score(
    a: &RawPixelBuffer,
    b: &RawPixelBuffer,
    a_lum: &Array2<f32>,
    b_lum: &Array2<f32>,
) -> f64 {
    let (h, w) = (a.height as usize, a.width as usize);

    let mut n = 0u64;
    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    let mut sum_a2 = 0.0f64;
    let mut sum_b2 = 0.0f64;
    let mut sum_ab = 0.0f64;

    for row in 0..h {
        for col in 0..w {
            let (x, y) = (col as u32, row as u32);
            if a.alpha(x, y) <= SSIM_ALPHA_FLOOR && b.alpha(x, y) <= SSIM_ALPHA_FLOOR {
                continue;
            }
            let la = a_lum[[row, col]] as f64;
            let lb = b_lum[[row, col]] as f64;
            n += 1;
            sum_a += la;
            sum_b += lb;
            sum_a2 += la * la;
            sum_b2 += lb * lb;
            sum_ab += la * lb;
        }
    }

    if n == 0 {
        return 1.0;
    }

    let n = n as f64;
    let mean_a = sum_a / n;
    let mean_b = sum_b / n;
    let var_a = sum_a2 / n - mean_a * mean_a;
    let var_b = sum_b2 / n - mean_b * mean_b;
    let cov = sum_ab / n - mean_a * mean_b;

    ((2.0 * mean_a * mean_b + SSIM_C1) * (2.0 * cov + SSIM_C2))
        / ((mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (var_a + var_b + SSIM_C2))
}

/// SSIM scores for every adjacent pair of already-normalized frames.
pub fn adjacent_scores(normalized: &[RawPixelBuffer]) -> Vec<f64> {
    let luminance: Vec<Array2<f32>> = if normalized.len() >= PARALLEL_FRAME_THRESHOLD {
        normalized.par_iter().map(|f| f.luminance()).collect()
    } else {
        normalized.iter().map(|f| f.luminance()).collect()
    };

    (0..normalized.len().saturating_sub(1))
        .into_par_iter()
        .map(|i| {
            ssim_score(
                &normalized[i],
                &normalized[i + 1],
                &luminance[i],
                &luminance[i + 1],
            )
        })
        .collect()
}

/// Flag interior frames whose both adjacent SSIM scores are extreme outliers.
pub fn detect(normalized: &[RawPixelBuffer], config: &DetectionConfig) -> AnomalyMap {
    let mut map = AnomalyMap::new();
    let scores = adjacent_scores(normalized);
    if scores.len() < 2 {
        return map;
    }

    let mut sorted = scores.clone();
    let quartiles = nearest_rank_quartiles(&mut sorted);
    let outlier_threshold = quartiles.q1 - config.ssim_iqr_multiplier * quartiles.iqr();

    for i in 1..normalized.len() - 1 {
        let prev = scores[i - 1];
        let next = scores[i];
        if prev < outlier_threshold
            && next < outlier_threshold
            && prev.min(next) < config.ssim_threshold
        {
            map.entry(i).or_default().push(Anomaly {
                severity: Severity::Severe,
                kind: AnomalyKind::StructuralDamage {
                    prev_score: prev,
                    next_score: next,
                    outlier_threshold,
                },
            });
        }
    }

    map
}
