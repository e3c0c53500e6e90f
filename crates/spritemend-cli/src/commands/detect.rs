use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use spritemend_core::analyze::analyze_frames;
use spritemend_core::codec;
use spritemend_core::detect::run_detection;
use spritemend_core::frame::RawPixelBuffer;
use spritemend_core::replace::resolve_replacements;
use spritemend_core::stats::aggregate;

use crate::sequence::{load_config, load_sequence};

use super::ThresholdArgs;

#[derive(Args)]
pub struct DetectArgs {
    /// Directory holding the PNG frame sequence
    pub dir: PathBuf,

    /// Pipeline config TOML (bucket rules and thresholds)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    args.thresholds.apply(&mut config.detection);
    config.validate()?;

    let sequence = load_sequence(&args.dir)?;
    let total = sequence.frames.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Decoding frames");

    let mut decoded: Vec<RawPixelBuffer> = Vec::with_capacity(total);
    for (i, bytes) in sequence.frames.iter().enumerate() {
        decoded.push(codec::decode(bytes)?);
        pb.set_position(i as u64 + 1);
    }
    pb.finish_and_clear();

    let analyses = analyze_frames(&decoded, &config.buckets);
    let stats = aggregate(&analyses);
    let anomalies = run_detection(
        &decoded,
        &analyses,
        &stats,
        config.buckets.primary.as_deref(),
        &config.detection,
    )?;
    let records = resolve_replacements(&anomalies, total);

    if records.is_empty() {
        println!("\nNo anomalous frames detected in {} frames.", total);
        return Ok(());
    }

    println!("\n{} anomalous frames (of {}):", records.len(), total);
    println!(
        "{:>5}  {:<9}  {:<28}  {}",
        "Frame", "Severity", "Reasons", "Replacement"
    );
    println!("{}", "-".repeat(62));

    for record in &records {
        let reasons: Vec<&str> = record.reasons.iter().map(|a| a.kind.label()).collect();
        let replacement = match record.replacement {
            Some(source) => format!("frame {source}"),
            None => "unresolved".into(),
        };
        println!(
            "{:>5}  {:<9}  {:<28}  {}",
            record.index,
            format!("{:?}", record.severity).to_lowercase(),
            reasons.join(", "),
            replacement
        );
    }

    Ok(())
}
