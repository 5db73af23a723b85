//! Game tunables
//!
//! Everything is in world units (the logical 400x600 play field) and per
//! frame. Loaded from an optional JSON file and validated before a session
//! is ever built.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::difficulty;

/// Optional hazard strips along the top and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HazardMode {
    /// Screen edges are the only boundary.
    #[default]
    None,
    /// Lava strips of `height` units at the top and bottom.
    LavaBands {
        height: f32,
        /// Hold the bird at the band edge instead of ending the run.
        #[serde(default)]
        clamp: bool,
    },
}

impl HazardMode {
    pub const DEFAULT_LAVA_HEIGHT: f32 = 50.0;

    pub fn lava(clamp: bool) -> Self {
        HazardMode::LavaBands {
            height: Self::DEFAULT_LAVA_HEIGHT,
            clamp,
        }
    }

    /// Height of each band, 0 when there are none.
    pub fn band_height(&self) -> f32 {
        match *self {
            HazardMode::None => 0.0,
            HazardMode::LavaBands { height, .. } => height,
        }
    }

    pub fn clamps(&self) -> bool {
        matches!(self, HazardMode::LavaBands { clamp: true, .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardMode::None => "none",
            HazardMode::LavaBands { clamp: false, .. } => "lava",
            HazardMode::LavaBands { clamp: true, .. } => "lava (clamped)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub fps: u32,

    // Bird
    pub gravity: f32,
    pub jump_impulse: f32,
    pub bird_x: f32,
    pub bird_radius: f32,
    pub bird_size: f32,
    /// |velocity| above which the pose and tilt change
    pub pose_threshold: f32,
    pub tilt_degrees: f32,

    // Pipes
    pub obstacle_width: f32,
    /// Minimum distance between a gap and either screen edge
    pub obstacle_margin: f32,
    pub spawn_lead: f32,
    pub spawn_spacing: f32,

    pub background_speed: f32,
    pub hazard: HazardMode,

    /// Obstacle RNG seed, random when unset
    pub seed: Option<u64>,
    pub sound: bool,
    /// Directory of `.sprite` files overriding the built-in art
    pub assets_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            screen_height: 600.0,
            fps: 60,

            gravity: 0.5,
            jump_impulse: -10.0,
            bird_x: 50.0,
            bird_radius: 15.0,
            bird_size: 40.0,
            pose_threshold: 1.0,
            tilt_degrees: 15.0,

            obstacle_width: 50.0,
            obstacle_margin: 50.0,
            spawn_lead: 100.0,
            spawn_spacing: 200.0,

            background_speed: 1.0,
            hazard: HazardMode::None,

            seed: None,
            sound: true,
            assets_dir: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation cannot play fairly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0) || !(self.screen_height > 0.0) {
            return Err(ConfigError::invalid(
                "screen_width",
                "screen must have a positive size",
            ));
        }
        if !(1..=240).contains(&self.fps) {
            return Err(ConfigError::invalid(
                "fps",
                format!("{} is outside 1..=240", self.fps),
            ));
        }
        if !(self.gravity > 0.0) {
            return Err(ConfigError::invalid("gravity", "must be positive"));
        }
        if !(self.jump_impulse < 0.0) {
            return Err(ConfigError::invalid(
                "jump_impulse",
                "must be negative (upwards)",
            ));
        }
        for (field, value) in [
            ("bird_radius", self.bird_radius),
            ("bird_size", self.bird_size),
            ("obstacle_width", self.obstacle_width),
            ("spawn_spacing", self.spawn_spacing),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        for (field, value) in [
            ("obstacle_margin", self.obstacle_margin),
            ("spawn_lead", self.spawn_lead),
            ("background_speed", self.background_speed),
            ("pose_threshold", self.pose_threshold),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::invalid(field, "must not be negative"));
            }
        }
        if self.bird_x - self.bird_radius < 0.0
            || self.bird_x + self.bird_radius > self.screen_width
        {
            return Err(ConfigError::invalid(
                "bird_x",
                "bird hitbox must lie inside the screen",
            ));
        }

        let narrowest = difficulty::NARROWEST_GAP;
        if 2.0 * self.bird_radius >= narrowest {
            return Err(ConfigError::invalid(
                "bird_radius",
                format!(
                    "a {narrowest} unit gap cannot fit a {} unit bird",
                    2.0 * self.bird_radius
                ),
            ));
        }

        if let HazardMode::LavaBands { height, .. } = self.hazard {
            if !(height > 0.0) {
                return Err(ConfigError::invalid("hazard.height", "must be positive"));
            }
        }

        let widest = difficulty::WIDEST_GAP;
        let margin = self.gap_margin();
        if widest + 2.0 * margin > self.screen_height {
            let field = if margin > self.obstacle_margin {
                "hazard.height"
            } else {
                "obstacle_margin"
            };
            return Err(ConfigError::invalid(
                field,
                format!(
                    "a {widest} unit gap with {margin} unit margins does not fit a {} unit screen",
                    self.screen_height
                ),
            ));
        }
        Ok(())
    }

    /// Wall-clock length of one simulation step.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Closest a gap may come to the top or bottom edge. Lava bands wider
    /// than the obstacle margin push gaps inwards.
    pub fn gap_margin(&self) -> f32 {
        self.obstacle_margin.max(self.hazard.band_height())
    }

    /// Vertical spawn position of the bird.
    pub fn start_y(&self) -> f32 {
        self.screen_height / 2.0
    }

    /// Horizontal position new pipes appear at.
    pub fn spawn_x(&self) -> f32 {
        self.screen_width + self.spawn_lead
    }
}
