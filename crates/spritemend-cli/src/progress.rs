use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use spritemend_core::pipeline::types::{PipelineStage, ProgressReporter};

/// Progress bars for pipeline stages.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl ProgressReporter for CliReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let bar = match total_items {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{msg} [{bar:40}] {pos}/{len}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        bar.set_message(stage.to_string());
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn advance(&self, items_done: usize) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.set_position(items_done as u64);
        }
    }

    fn finish_stage(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
