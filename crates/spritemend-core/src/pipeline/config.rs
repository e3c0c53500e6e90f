use serde::{Deserialize, Serialize};

use crate::analyze::BucketConfig;
use crate::detect::DetectionConfig;
use crate::error::Result;
use crate::stabilize::StabilizeConfig;

/// Full pipeline configuration.
///
/// Bucket rules are per-art-style calibration data and have no built-in
/// default palette; a config with no rules still runs, with only the
/// reserved `other` bucket feeding the histogram pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub buckets: BucketConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub stabilize: StabilizeConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.buckets.validate()
    }
}
