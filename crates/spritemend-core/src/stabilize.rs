//! Canvas-anchored stabilization.
//!
//! Every frame's content is cropped to its alpha bounding box and
//! re-composited onto one uniform transparent canvas, horizontally centered
//! and bottom-anchored. Subjects are assumed to stand on a floor plane, so
//! the grounded anchor is fixed policy rather than configuration.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{self, CompositeLayer, CropRect};
use crate::consts::{
    DEFAULT_CONTENT_ALPHA_THRESHOLD, DEFAULT_STABILIZE_MARGIN, PARALLEL_FRAME_THRESHOLD,
};
use crate::error::Result;
use crate::frame::RawPixelBuffer;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StabilizeConfig {
    /// Alpha above which a pixel counts as content for the bounding box.
    #[serde(default = "default_content_alpha_threshold")]
    pub content_alpha_threshold: u8,
    /// Combined-axis margin (pixels) added to the maximum content extent.
    /// Half of it sits below the content so the subject keeps a fixed
    /// distance from the canvas bottom.
    #[serde(default = "default_margin")]
    pub margin: u32,
}

fn default_content_alpha_threshold() -> u8 {
    DEFAULT_CONTENT_ALPHA_THRESHOLD
}
fn default_margin() -> u32 {
    DEFAULT_STABILIZE_MARGIN
}

impl Default for StabilizeConfig {
    fn default() -> Self {
        Self {
            content_alpha_threshold: DEFAULT_CONTENT_ALPHA_THRESHOLD,
            margin: DEFAULT_STABILIZE_MARGIN,
        }
    }
}

/// Tight bounding box of pixels with alpha above the threshold, or `None`
/// for a frame with no content.
pub fn content_bounds(buf: &RawPixelBuffer, alpha_threshold: u8) -> Option<CropRect> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for y in 0..buf.height {
        for x in 0..buf.width {
            if buf.alpha(x, y) > alpha_threshold {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    found.then(|| CropRect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Stabilize the whole sequence onto a uniform bottom-anchored canvas.
///
/// The canvas is sized to the maximum content extent plus the margin.
/// Stabilizing an already-stabilized sequence reproduces it exactly: content
/// boxes, canvas size, and placement are all unchanged by a second pass.
pub fn stabilize_frames(
    frames: &[RawPixelBuffer],
    config: &StabilizeConfig,
) -> Result<Vec<RawPixelBuffer>> {
    let bounds: Vec<Option<CropRect>> = if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames
            .par_iter()
            .map(|f| content_bounds(f, config.content_alpha_threshold))
            .collect()
    } else {
        frames
            .iter()
            .map(|f| content_bounds(f, config.content_alpha_threshold))
            .collect()
    };

    let max_w = bounds.iter().flatten().map(|b| b.width).max().unwrap_or(0);
    let max_h = bounds.iter().flatten().map(|b| b.height).max().unwrap_or(0);
    let canvas_w = (max_w + config.margin).max(1);
    let canvas_h = (max_h + config.margin).max(1);
    debug!(canvas_w, canvas_h, max_w, max_h, "Stabilization canvas sized");

    frames
        .iter()
        .zip(&bounds)
        .map(|(frame, bound)| {
            let Some(rect) = bound else {
                // Nothing to anchor; the frame still gets the uniform canvas.
                return Ok(RawPixelBuffer::blank(canvas_w, canvas_h));
            };
            let content = codec::crop(frame, rect)?;
            let left = ((canvas_w - content.width) / 2) as i64;
            let top = (canvas_h - content.height - config.margin / 2) as i64;
            codec::composite(
                canvas_w,
                canvas_h,
                &[CompositeLayer {
                    input: &content,
                    left,
                    top,
                }],
            )
        })
        .collect()
}
