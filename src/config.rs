//! Session tuning knobs.
//!
//! Defaults reproduce the classic gallery pacing. With the `serde_json` feature the
//! page can hand a partial JSON object to `start_game_with_config`; missing fields
//! fall back to the defaults.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::GalleryError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GalleryConfig {
    /// Targets placed on screen at start and after every restart.
    pub initial_targets: usize,
    /// Delay before the first automatic spawn (ms).
    pub spawn_interval_ms: f64,
    /// Spawn interval never shrinks below this (ms).
    pub min_spawn_interval_ms: f64,
    /// Multiplier applied to the interval after each spawn.
    pub spawn_interval_decay: f64,
    /// Upper bound for a single simulation step (ms).
    pub max_frame_dt_ms: f64,
    /// `KeyboardEvent.code` that fires at the crosshair.
    pub fire_key: String,
    pub sound: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            initial_targets: 6,
            spawn_interval_ms: 900.0,
            min_spawn_interval_ms: 400.0,
            spawn_interval_decay: 0.995,
            max_frame_dt_ms: 50.0,
            fire_key: "Space".to_string(),
            sound: true,
        }
    }
}

impl GalleryConfig {
    /// Next interval after a spawn: shrink multiplicatively, clamp to the floor.
    pub fn next_spawn_interval(&self, current_ms: f64) -> f64 {
        (current_ms * self.spawn_interval_decay).max(self.min_spawn_interval_ms)
    }

    /// Reject pacing values the frame loop cannot run with: a negative step cap, a
    /// non-positive spawn floor, a start interval under the floor, or a decay that
    /// does not shrink toward the floor.
    pub fn validate(&self) -> Result<(), GalleryError> {
        let bad = |msg: String| -> Result<(), GalleryError> { Err(GalleryError::Config(msg)) };
        if !(self.max_frame_dt_ms >= 0.0) {
            return bad(format!("max_frame_dt_ms must be >= 0, got {}", self.max_frame_dt_ms));
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return bad(format!("min_spawn_interval_ms must be > 0, got {}", self.min_spawn_interval_ms));
        }
        if !(self.spawn_interval_ms >= self.min_spawn_interval_ms) {
            return bad(format!(
                "spawn_interval_ms ({}) is below min_spawn_interval_ms ({})",
                self.spawn_interval_ms, self.min_spawn_interval_ms
            ));
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return bad(format!("spawn_interval_decay must be in (0, 1], got {}", self.spawn_interval_decay));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GalleryError> {
        let config: Self = serde_json::from_str(json).map_err(|e| GalleryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
