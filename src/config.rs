use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::CarouselError;

/// Tuning knobs for the engine. Every field has a default so a partial JSON
/// object is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    pub min_ready_clips: usize,
    pub slide_duration: f32,
    pub resting_dot_px: f32,
    pub mobile_max_px: f32,
    pub tablet_max_px: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            min_ready_clips: MIN_READY_CLIPS,
            slide_duration: SLIDE_DURATION,
            resting_dot_px: RESTING_DOT_PX,
            mobile_max_px: MOBILE_MAX_WIDTH,
            tablet_max_px: TABLET_MAX_WIDTH,
        }
    }
}

impl CarouselConfig {
    pub fn from_json(json: &str) -> Result<Self, CarouselError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CarouselError> {
        if self.min_ready_clips == 0 {
            return Err(CarouselError::Config("minReadyClips must be at least 1".into()));
        }
        if !(self.slide_duration > 0.0) {
            return Err(CarouselError::Config("slideDuration must be positive".into()));
        }
        if !(self.resting_dot_px > 0.0) {
            return Err(CarouselError::Config("restingDotPx must be positive".into()));
        }
        if !(self.mobile_max_px < self.tablet_max_px) {
            return Err(CarouselError::Config("mobileMaxPx must be below tabletMaxPx".into()));
        }
        Ok(())
    }

    /// Number of ready clips required before sampling may start.
    pub fn ready_threshold(&self, clip_count: usize) -> usize {
        self.min_ready_clips.min(clip_count)
    }
}
