use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use crate::analyze::analyze_frames;
use crate::codec;
use crate::consts::{MIN_DETECTION_FRAMES, PARALLEL_FRAME_THRESHOLD};
use crate::detect::{run_detection, DETECTION_METHODS};
use crate::error::{Result, SpriteMendError};
use crate::frame::RawPixelBuffer;
use crate::replace::{resolve_replacements, BadFrameRecord};
use crate::stabilize::stabilize_frames;
use crate::stats::aggregate;
use crate::verify::verify_frames;

use super::config::PipelineConfig;
use super::report::{ReplacementRecord, Report};
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Corrected sequence plus its diagnostic report.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Re-encoded frames, same order and length as the input.
    pub frames: Vec<Vec<u8>>,
    pub report: Report,
}

/// Run the full correction pipeline:
/// decode -> analyze -> detect -> replace -> stabilize -> verify -> encode.
pub fn run_pipeline(frames: &[Vec<u8>], config: &PipelineConfig) -> Result<PipelineOutput> {
    run_pipeline_reported(frames, config, Arc::new(NoOpReporter))
}

/// Full pipeline with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    frames: &[Vec<u8>],
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    config.validate()?;
    let total = frames.len();
    if total == 0 {
        return Err(SpriteMendError::EmptySequence);
    }
    info!(total_frames = total, "Starting correction pipeline");

    let decoded = decode_all(frames, &reporter)?;

    // Per-frame analysis has no cross-frame dependency; the aggregation fold
    // starts only after every frame task has completed.
    reporter.begin_stage(PipelineStage::Analyzing, Some(total));
    let analyses = analyze_frames(&decoded, &config.buckets);
    reporter.finish_stage();

    let stats = aggregate(&analyses);

    reporter.begin_stage(PipelineStage::Detecting, None);
    let anomalies = run_detection(
        &decoded,
        &analyses,
        &stats,
        config.buckets.primary.as_deref(),
        &config.detection,
    )?;
    reporter.finish_stage();

    let bad_frames = resolve_replacements(&anomalies, total);

    reporter.begin_stage(PipelineStage::Replacing, Some(bad_frames.len()));
    let mut corrected = decoded;
    let mut replacements = Vec::new();
    for record in &bad_frames {
        let Some(source) = record.replacement else {
            continue;
        };
        corrected[record.index] = corrected[source].clone();
        replacements.push(ReplacementRecord {
            bad_frame: record.index,
            replaced_with: source,
            reasons: record.reasons.iter().map(|a| a.kind.label().into()).collect(),
        });
        info!(
            bad_frame = record.index,
            replaced_with = source,
            "Replaced frame"
        );
    }
    reporter.finish_stage();

    let detection_ran = total >= MIN_DETECTION_FRAMES;
    finish(
        corrected,
        bad_frames,
        replacements,
        detection_ran,
        config,
        &reporter,
    )
}

/// Stabilization-only pass for sequences already known good: detection is
/// skipped entirely, stabilization and verification still run.
pub fn stabilize_sequence(frames: &[Vec<u8>], config: &PipelineConfig) -> Result<PipelineOutput> {
    let total = frames.len();
    if total == 0 {
        return Err(SpriteMendError::EmptySequence);
    }
    let reporter: Arc<dyn ProgressReporter> = Arc::new(NoOpReporter);
    let decoded = decode_all(frames, &reporter)?;
    finish(decoded, Vec::new(), Vec::new(), false, config, &reporter)
}

fn decode_all(
    frames: &[Vec<u8>],
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<Vec<RawPixelBuffer>> {
    let total = frames.len();
    reporter.begin_stage(PipelineStage::Decoding, Some(total));
    let done = AtomicUsize::new(0);
    let decoded: Result<Vec<RawPixelBuffer>> = if total >= PARALLEL_FRAME_THRESHOLD {
        frames
            .par_iter()
            .map(|bytes| {
                let buf = codec::decode(bytes)?;
                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                Ok(buf)
            })
            .collect()
    } else {
        frames
            .iter()
            .map(|bytes| {
                let buf = codec::decode(bytes)?;
                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                Ok(buf)
            })
            .collect()
    };
    reporter.finish_stage();
    decoded
}

/// Shared tail of both entry points: stabilize, verify, encode, report.
fn finish(
    corrected: Vec<RawPixelBuffer>,
    bad_frames: Vec<BadFrameRecord>,
    replacements: Vec<ReplacementRecord>,
    detection_ran: bool,
    config: &PipelineConfig,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    let total = corrected.len();

    reporter.begin_stage(PipelineStage::Stabilizing, Some(total));
    let stabilized = stabilize_frames(&corrected, &config.stabilize)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Verifying, None);
    let verification = verify_frames(&stabilized, config.detection.pixel_diff_tolerance)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Encoding, Some(total));
    let done = AtomicUsize::new(0);
    let encoded: Result<Vec<Vec<u8>>> = if total >= PARALLEL_FRAME_THRESHOLD {
        stabilized
            .par_iter()
            .map(|buf| {
                let bytes = codec::encode(buf)?;
                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                Ok(bytes)
            })
            .collect()
    } else {
        stabilized
            .iter()
            .map(|buf| {
                let bytes = codec::encode(buf)?;
                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                Ok(bytes)
            })
            .collect()
    };
    reporter.finish_stage();

    let detection_methods = if detection_ran {
        DETECTION_METHODS.iter().map(|m| m.to_string()).collect()
    } else {
        Vec::new()
    };

    info!(
        bad_frames = bad_frames.len(),
        replaced = replacements.len(),
        verified = verification.passed,
        "Pipeline complete"
    );

    Ok(PipelineOutput {
        frames: encoded?,
        report: Report {
            total_frames: total,
            bad_frames,
            replacements,
            stabilized: true,
            detection_methods,
            verified: verification.passed,
            verification_details: verification,
        },
    })
}
