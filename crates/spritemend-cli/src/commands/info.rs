use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use spritemend_core::analyze::{analyze_frame, BucketConfig};
use spritemend_core::codec;

use crate::sequence::load_sequence;

#[derive(Args)]
pub struct InfoArgs {
    /// Directory holding the PNG frame sequence
    pub dir: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let sequence = load_sequence(&args.dir)?;
    let total = sequence.frames.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Decoding frames");

    let buckets = BucketConfig::default();
    let mut rows = Vec::with_capacity(total);
    for (i, bytes) in sequence.frames.iter().enumerate() {
        let buf = codec::decode(bytes)?;
        let analysis = analyze_frame(i, &buf, &buckets);
        rows.push((buf.width, buf.height, analysis.alpha_ratios));
        pb.set_position(i as u64 + 1);
    }
    pb.finish_and_clear();

    println!("\n{} frames in {}:", total, args.dir.display());
    println!(
        "{:>5}  {:<16}  {:>10}  {:>8}  {:>8}  {:>8}",
        "Frame", "File", "Size", "Opaque", "Semi", "Transp"
    );
    println!("{}", "-".repeat(66));

    for (i, (width, height, ratios)) in rows.iter().enumerate() {
        println!(
            "{:>5}  {:<16}  {:>10}  {:>7.1}%  {:>7.1}%  {:>7.1}%",
            i,
            sequence.names[i],
            format!("{width}x{height}"),
            ratios.opaque * 100.0,
            ratios.semi_transparent * 100.0,
            ratios.transparent * 100.0
        );
    }

    Ok(())
}
