use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use spritemend_core::pipeline::stabilize_sequence;

use crate::sequence::{load_config, load_sequence, write_sequence};

#[derive(Args)]
pub struct StabilizeArgs {
    /// Directory holding the PNG frame sequence
    pub dir: PathBuf,

    /// Output directory for stabilized frames
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pipeline config TOML (stabilization margin and alpha threshold)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &StabilizeArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let sequence = load_sequence(&args.dir)?;

    let output = stabilize_sequence(&sequence.frames, &config)?;
    write_sequence(&args.output, &sequence.names, &output.frames)?;

    if output.report.verified {
        println!(
            "Stabilized {} frames into {}",
            output.report.total_frames,
            args.output.display()
        );
    } else {
        println!(
            "Stabilized {} frames into {} (verification issues: {})",
            output.report.total_frames,
            args.output.display(),
            output.report.verification_details.issues.join("; ")
        );
    }
    Ok(())
}
