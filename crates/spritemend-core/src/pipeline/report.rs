use serde::Serialize;

use crate::replace::BadFrameRecord;
use crate::verify::Verification;

/// One applied substitution, in report form.
#[derive(Clone, Debug, Serialize)]
pub struct ReplacementRecord {
    pub bad_frame: usize,
    pub replaced_with: usize,
    /// Anomaly type labels that condemned the frame.
    pub reasons: Vec<String>,
}

/// Diagnostic report assembled by the orchestrator.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub total_frames: usize,
    pub bad_frames: Vec<BadFrameRecord>,
    pub replacements: Vec<ReplacementRecord>,
    pub stabilized: bool,
    pub detection_methods: Vec<String>,
    pub verified: bool,
    pub verification_details: Verification,
}

impl Report {
    /// Count of frames left unresolved (no good substitute existed).
    pub fn unresolved_count(&self) -> usize {
        self.bad_frames
            .iter()
            .filter(|b| b.replacement.is_none())
            .count()
    }
}
