use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use spritemend_core::analyze::{BucketConfig, BucketPredicate, BucketRule};
use spritemend_core::detect::DetectionConfig;
use spritemend_core::pipeline::PipelineConfig;
use spritemend_core::stabilize::StabilizeConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default PipelineConfig as TOML.
///
/// The emitted bucket rules are placeholders: bucket definitions are
/// calibration data for one specific art style and must be adjusted to the
/// subject's actual palette.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = PipelineConfig {
        buckets: BucketConfig {
            rules: vec![
                BucketRule {
                    label: "skin".into(),
                    predicate: BucketPredicate::RgbRange {
                        r: [180, 255],
                        g: [120, 210],
                        b: [90, 180],
                    },
                },
                BucketRule {
                    label: "outline".into(),
                    predicate: BucketPredicate::LumaRange { min: 0, max: 60 },
                },
                BucketRule {
                    label: "armor".into(),
                    predicate: BucketPredicate::NearGray { max_spread: 24 },
                },
            ],
            primary: Some("skin".into()),
        },
        detection: DetectionConfig::default(),
        stabilize: StabilizeConfig::default(),
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
