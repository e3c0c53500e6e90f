use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BUCKET_PRESENCE_FLOOR, DEFAULT_COLOR_RATIO_THRESHOLD, DEFAULT_HALO_MARGIN,
    DEFAULT_OPACITY_IQR_MULTIPLIER, DEFAULT_PIXEL_DIFF_OUTLIER_MULTIPLIER,
    DEFAULT_PIXEL_DIFF_THRESHOLD, DEFAULT_PIXEL_DIFF_TOLERANCE, DEFAULT_PRIMARY_PRESENCE_FLOOR,
    DEFAULT_SSIM_IQR_MULTIPLIER, DEFAULT_SSIM_THRESHOLD,
};

/// Anomaly detection thresholds.
///
/// The defaults were tuned against one reference animation style. New art
/// styles are expected to need recalibration, which is why every threshold is
/// part of the configuration rather than a fixed constant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Bucket count / median ratio below which a bucket is considered lost.
    #[serde(default = "default_color_ratio_threshold")]
    pub color_ratio_threshold: f64,
    /// Median pixel count a bucket needs before it is checked at all.
    #[serde(default = "default_bucket_presence_floor")]
    pub bucket_presence_floor: f64,
    /// Median pixel count above which the designated primary bucket gets the
    /// more specific loss diagnosis.
    #[serde(default = "default_primary_presence_floor")]
    pub primary_presence_floor: f64,
    /// IQR multiplier for the opacity-ratio outlier bounds.
    #[serde(default = "default_opacity_iqr_multiplier")]
    pub opacity_iqr_multiplier: f64,
    /// Margin above the semi-transparent-ratio Q3 before a frame is haloed.
    #[serde(default = "default_halo_margin")]
    pub halo_margin: f64,
    /// Absolute SSIM floor for the structural-damage double check.
    #[serde(default = "default_ssim_threshold")]
    pub ssim_threshold: f64,
    /// IQR multiplier for the strict SSIM outlier floor.
    #[serde(default = "default_ssim_iqr_multiplier")]
    pub ssim_iqr_multiplier: f64,
    /// Absolute floor for the pixel-difference outlier bound.
    #[serde(default = "default_pixel_diff_threshold")]
    pub pixel_diff_threshold: f64,
    /// Multiplier on the median adjacent diff for the outlier bound.
    #[serde(default = "default_pixel_diff_outlier_multiplier")]
    pub pixel_diff_outlier_multiplier: f64,
    /// Per-channel tolerance (fraction of 255) of the pixelwise compare.
    #[serde(default = "default_pixel_diff_tolerance")]
    pub pixel_diff_tolerance: f64,
}

fn default_color_ratio_threshold() -> f64 {
    DEFAULT_COLOR_RATIO_THRESHOLD
}
fn default_bucket_presence_floor() -> f64 {
    DEFAULT_BUCKET_PRESENCE_FLOOR
}
fn default_primary_presence_floor() -> f64 {
    DEFAULT_PRIMARY_PRESENCE_FLOOR
}
fn default_opacity_iqr_multiplier() -> f64 {
    DEFAULT_OPACITY_IQR_MULTIPLIER
}
fn default_halo_margin() -> f64 {
    DEFAULT_HALO_MARGIN
}
fn default_ssim_threshold() -> f64 {
    DEFAULT_SSIM_THRESHOLD
}
fn default_ssim_iqr_multiplier() -> f64 {
    DEFAULT_SSIM_IQR_MULTIPLIER
}
fn default_pixel_diff_threshold() -> f64 {
    DEFAULT_PIXEL_DIFF_THRESHOLD
}
fn default_pixel_diff_outlier_multiplier() -> f64 {
    DEFAULT_PIXEL_DIFF_OUTLIER_MULTIPLIER
}
fn default_pixel_diff_tolerance() -> f64 {
    DEFAULT_PIXEL_DIFF_TOLERANCE
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            color_ratio_threshold: DEFAULT_COLOR_RATIO_THRESHOLD,
            bucket_presence_floor: DEFAULT_BUCKET_PRESENCE_FLOOR,
            primary_presence_floor: DEFAULT_PRIMARY_PRESENCE_FLOOR,
            opacity_iqr_multiplier: DEFAULT_OPACITY_IQR_MULTIPLIER,
            halo_margin: DEFAULT_HALO_MARGIN,
            ssim_threshold: DEFAULT_SSIM_THRESHOLD,
            ssim_iqr_multiplier: DEFAULT_SSIM_IQR_MULTIPLIER,
            pixel_diff_threshold: DEFAULT_PIXEL_DIFF_THRESHOLD,
            pixel_diff_outlier_multiplier: DEFAULT_PIXEL_DIFF_OUTLIER_MULTIPLIER,
            pixel_diff_tolerance: DEFAULT_PIXEL_DIFF_TOLERANCE,
        }
    }
}
