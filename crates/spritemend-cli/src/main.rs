mod commands;
mod progress;
mod sequence;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spritemend", about = "Sprite frame repair and stabilization tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-frame dimensions and alpha statistics
    Info(commands::info::InfoArgs),
    /// Detect anomalous frames without writing any output
    Detect(commands::detect::DetectArgs),
    /// Detect, repair, and stabilize a frame sequence
    Fix(commands::fix::FixArgs),
    /// Stabilize a sequence without running anomaly detection
    Stabilize(commands::stabilize::StabilizeArgs),
    /// Print or save a default configuration file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Fix(args) => commands::fix::run(args),
        Commands::Stabilize(args) => commands::stabilize::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
