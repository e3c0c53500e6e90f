pub mod config;
pub mod detect;
pub mod fix;
pub mod info;
pub mod stabilize;

use clap::Args;
use spritemend_core::detect::DetectionConfig;

/// Detection threshold overrides shared by `detect` and `fix`.
/// Values given on the command line win over the config file.
#[derive(Args)]
pub struct ThresholdArgs {
    /// Bucket count / median ratio below which a bucket is considered lost
    #[arg(long)]
    pub color_ratio_threshold: Option<f64>,

    /// IQR multiplier for the opacity-ratio outlier bounds
    #[arg(long)]
    pub opacity_iqr_multiplier: Option<f64>,

    /// Absolute SSIM floor for the structural-damage double check
    #[arg(long)]
    pub ssim_threshold: Option<f64>,

    /// Absolute floor for the pixel-difference outlier bound
    #[arg(long)]
    pub pixel_diff_threshold: Option<f64>,
}

impl ThresholdArgs {
    pub fn apply(&self, config: &mut DetectionConfig) {
        if let Some(v) = self.color_ratio_threshold {
            config.color_ratio_threshold = v;
        }
        if let Some(v) = self.opacity_iqr_multiplier {
            config.opacity_iqr_multiplier = v;
        }
        if let Some(v) = self.ssim_threshold {
            config.ssim_threshold = v;
        }
        if let Some(v) = self.pixel_diff_threshold {
            config.pixel_diff_threshold = v;
        }
    }
}
