use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use spritemend_core::pipeline::run_pipeline_reported;

use crate::progress::CliReporter;
use crate::sequence::{load_config, load_sequence, write_report, write_sequence};
use crate::summary::print_report_summary;

use super::ThresholdArgs;

#[derive(Args)]
pub struct FixArgs {
    /// Directory holding the PNG frame sequence
    pub dir: PathBuf,

    /// Output directory for corrected frames
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pipeline config TOML (bucket rules and thresholds)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip writing report.json next to the corrected frames
    #[arg(long)]
    pub no_report: bool,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

pub fn run(args: &FixArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    args.thresholds.apply(&mut config.detection);
    config.validate()?;

    let sequence = load_sequence(&args.dir)?;
    let output = run_pipeline_reported(&sequence.frames, &config, Arc::new(CliReporter::new()))?;

    write_sequence(&args.output, &sequence.names, &output.frames)?;
    if !args.no_report {
        write_report(&args.output.join("report.json"), &output.report)?;
    }

    print_report_summary(&output.report);
    println!("Corrected frames written to {}", args.output.display());
    Ok(())
}
