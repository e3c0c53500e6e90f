/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum PipelineStage {
    Decoding,
    Analyzing,
    Detecting,
    Replacing,
    Stabilizing,
    Verifying,
    Encoding,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding frames"),
            Self::Analyzing => write!(f, "Analyzing pixels"),
            Self::Detecting => write!(f, "Detecting anomalies"),
            Self::Replacing => write!(f, "Replacing bad frames"),
            Self::Stabilizing => write!(f, "Stabilizing"),
            Self::Verifying => write!(f, "Verifying"),
            Self::Encoding => write!(f, "Encoding frames"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
