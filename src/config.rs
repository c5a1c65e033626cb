//! Pipeline configuration, loadable from YAML or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::{SpeedConfig, TrackerConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub tracker: TrackerConfig,
    pub speed: SpeedConfig,
}

impl PipelineConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if self.tracker.detection_interval == 0 {
            return Err(Error::Config("tracker.detection_interval must be at least 1".into()));
        }
        if !self.tracker.eviction_quality.is_finite() {
            return Err(Error::Config("tracker.eviction_quality must be finite".into()));
        }
        if !positive(self.speed.pixels_per_meter) {
            return Err(Error::Config("speed.pixels_per_meter must be positive".into()));
        }
        if !positive(self.speed.assumed_fps) {
            return Err(Error::Config("speed.assumed_fps must be positive".into()));
        }
        let (lo, hi) = self.speed.calibration_band;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(Error::Config(format!(
                "speed.calibration_band [{lo}, {hi}] is not an ordered interval"
            )));
        }
        Ok(())
    }
}
