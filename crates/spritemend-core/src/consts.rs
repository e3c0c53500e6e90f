/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Minimum sequence length for anomaly detection. Below this the statistics
/// are meaningless and detection is skipped entirely.
pub const MIN_DETECTION_FRAMES: usize = 3;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Alpha above which a pixel participates in color-bucket classification.
pub const BUCKET_ALPHA_THRESHOLD: u8 = 128;

/// Alpha above which a pixel counts as fully opaque for alpha-ratio analysis.
pub const ALPHA_OPAQUE_MIN: u8 = 250;

/// Alpha at or below which a pixel counts as fully transparent for
/// alpha-ratio analysis. Pixels in (transparent, opaque] are semi-transparent.
pub const ALPHA_TRANSPARENT_MAX: u8 = 5;

/// Reserved remainder bucket for pixels matching no classification rule.
pub const OTHER_BUCKET: &str = "other";

/// Default minimum frame-count ratio vs. the cross-frame bucket median before
/// a bucket is considered lost.
pub const DEFAULT_COLOR_RATIO_THRESHOLD: f64 = 0.35;

/// Bucket ratio below which a color loss is severe rather than moderate.
pub const SEVERE_COLOR_RATIO: f64 = 0.2;

/// Cross-frame median pixel count a bucket must exceed before it is checked
/// for color loss. Sparse buckets produce unstable ratios.
pub const DEFAULT_BUCKET_PRESENCE_FLOOR: f64 = 50.0;

/// Median pixel count above which a bucket qualifies as the primary subject
/// bucket for the more specific loss diagnosis.
pub const DEFAULT_PRIMARY_PRESENCE_FLOOR: f64 = 100.0;

/// Default IQR multiplier for opacity-ratio outlier bounds.
pub const DEFAULT_OPACITY_IQR_MULTIPLIER: f64 = 2.5;

/// Default margin above the semi-transparent-ratio Q3 before a frame is
/// flagged as haloed.
pub const DEFAULT_HALO_MARGIN: f64 = 0.08;

/// Margin above the semi-transparent-ratio Q3 at which a halo is severe.
pub const SEVERE_HALO_MARGIN: f64 = 0.15;

/// Default absolute SSIM floor used in the structural-damage double check.
pub const DEFAULT_SSIM_THRESHOLD: f64 = 0.55;

/// IQR multiplier for the strict SSIM outlier floor. Animations have high
/// natural frame-to-frame variance; only extreme outliers may be flagged.
pub const DEFAULT_SSIM_IQR_MULTIPLIER: f64 = 3.0;

/// Alpha above which a pixel participates in the SSIM luminance statistics
/// when either of the two compared frames has content there.
pub const SSIM_ALPHA_FLOOR: u8 = 64;

/// SSIM stabilization constant C1 = (0.01 * 255)^2.
pub const SSIM_C1: f64 = 6.5025;

/// SSIM stabilization constant C2 = (0.03 * 255)^2.
pub const SSIM_C2: f64 = 58.5225;

/// Default absolute floor for the pixel-difference outlier bound.
pub const DEFAULT_PIXEL_DIFF_THRESHOLD: f64 = 0.15;

/// Multiplier applied to the median adjacent diff when deriving the
/// pixel-difference outlier bound.
pub const DEFAULT_PIXEL_DIFF_OUTLIER_MULTIPLIER: f64 = 2.5;

/// Default per-channel tolerance (fraction of 255) for the tolerant
/// pixelwise compare.
pub const DEFAULT_PIXEL_DIFF_TOLERANCE: f64 = 0.1;

/// Default alpha threshold for the stabilizer's content bounding box.
pub const DEFAULT_CONTENT_ALPHA_THRESHOLD: u8 = 20;

/// Default combined-axis margin (in pixels) added around the maximum content
/// extent when sizing the stabilized canvas.
pub const DEFAULT_STABILIZE_MARGIN: u32 = 20;

/// Sampled adjacent-frame difference ratio above which the verifier reports
/// large variance.
pub const VERIFY_VARIANCE_THRESHOLD: f64 = 0.30;
