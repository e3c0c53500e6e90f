//! Final advisory sanity pass. Findings are surfaced in the report but never
//! block or alter the output.

use serde::Serialize;
use tracing::debug;

use crate::codec;
use crate::consts::VERIFY_VARIANCE_THRESHOLD;
use crate::error::Result;
use crate::frame::RawPixelBuffer;

/// Outcome of the verification pass.
#[derive(Clone, Debug, Serialize)]
pub struct Verification {
    pub passed: bool,
    pub issues: Vec<String>,
}

/// Check dimension uniformity and sampled frame-to-frame variance.
///
/// Sequences with more than 2 frames are sampled at the first, middle, and
/// last position; consecutive sample pairs whose pixel-difference ratio
/// exceeds the variance threshold are reported.
pub fn verify_frames(frames: &[RawPixelBuffer], diff_tolerance: f64) -> Result<Verification> {
    let mut issues = Vec::new();

    let uniform = frames
        .windows(2)
        .all(|w| w[0].width == w[1].width && w[0].height == w[1].height);
    if !uniform {
        issues.push("frame dimensions are not uniform after stabilization".to_string());
    }

    if uniform && frames.len() > 2 {
        let samples = [0, frames.len() / 2, frames.len() - 1];
        for pair in samples.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            let a = &frames[i];
            let diff = codec::pixel_diff(a, &frames[j], diff_tolerance)?;
            let ratio = diff as f64 / a.pixel_count() as f64;
            debug!(from = i, to = j, ratio, "Sampled frame difference");
            if ratio > VERIFY_VARIANCE_THRESHOLD {
                issues.push(format!(
                    "large variance between sampled frames {i} and {j}: {:.1}% of pixels differ",
                    ratio * 100.0
                ));
            }
        }
    }

    Ok(Verification {
        passed: issues.is_empty(),
        issues,
    })
}
