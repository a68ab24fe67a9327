//! Game settings
//!
//! Every tunable constant of the simulation lives here. Settings are read
//! from the JSON file named by `FLAPPY_MAPS_CONFIG`; missing fields fall back
//! to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "FLAPPY_MAPS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub canvas_width: f64,
    /// Height of the background image; the floor the actor settles on.
    pub playfield_height: f64,
    /// Ground strip drawn below the playfield.
    pub ground_height: f64,
    /// Horizontal period of the ground tile.
    pub ground_period: f64,

    // === Actor ===
    pub actor_x: f64,
    pub actor_start_y: f64,
    /// Downward acceleration, units/s².
    pub gravity: f64,
    /// Velocity set by the player's impulse (negative is up).
    pub impulse: f64,
    /// Animation frames advanced per second.
    pub animation_rate: f64,
    /// Number of interchangeable frame sets the actor picks from.
    pub frame_sets: usize,

    // === Obstacles ===
    pub obstacle_speed: f64,
    pub spawn_interval_ms: u64,
    pub obstacle_capacity: usize,
    /// Vertical distance of each sub-rectangle from the gap reference.
    pub obstacle_offset: f64,
    /// Gap reference is `gap_base + u * gap_step` with `u` in `gap_range`.
    pub gap_base: f64,
    pub gap_step: f64,
    pub gap_range: (f64, f64),

    // === Scoring ===
    pub points_per_theme: u32,

    // === Loop ===
    /// Largest delta fed to the simulation, seconds (0 = no cap).
    pub max_delta: f64,
    /// Target frame duration for the terminal loop.
    pub frame_ms: u64,
    pub sound: bool,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 288.0,
            playfield_height: 512.0,
            ground_height: 112.0,
            ground_period: 24.0,

            actor_x: 50.0,
            actor_start_y: 200.0,
            gravity: 1200.0,
            impulse: -350.0,
            animation_rate: 4.0,
            frame_sets: 3,

            obstacle_speed: 100.0,
            spawn_interval_ms: 3500,
            obstacle_capacity: 4,
            obstacle_offset: 340.0,
            gap_base: 100.0,
            gap_step: 50.0,
            gap_range: (-3.0, 2.0),

            points_per_theme: 5,

            max_delta: 0.25,
            frame_ms: 16,
            sound: true,
            seed: None,
        }
    }
}

impl Settings {
    pub fn canvas_height(&self) -> f64 {
        self.playfield_height + self.ground_height
    }

    /// Load from `FLAPPY_MAPS_CONFIG` if set, defaults otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: display.clone(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded settings from {display}");
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("canvas_width", self.canvas_width)?;
        positive("playfield_height", self.playfield_height)?;
        positive("ground_height", self.ground_height)?;
        positive("ground_period", self.ground_period)?;
        positive("gravity", self.gravity)?;
        positive("animation_rate", self.animation_rate)?;
        positive("obstacle_speed", self.obstacle_speed)?;
        positive("obstacle_offset", self.obstacle_offset)?;
        positive("gap_step", self.gap_step)?;
        if !self.gap_base.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gap_base",
                reason: "must be a finite number",
            });
        }
        if !(0.0..self.playfield_height).contains(&self.actor_start_y) {
            return Err(ConfigError::Invalid {
                field: "actor_start_y",
                reason: "must lie inside the playfield",
            });
        }
        if self.points_per_theme == 0 {
            return Err(ConfigError::Invalid {
                field: "points_per_theme",
                reason: "must be at least 1",
            });
        }
        if self.impulse >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "impulse",
                reason: "must point upward (negative)",
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be at least 1",
            });
        }
        if self.obstacle_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "obstacle_capacity",
                reason: "must be at least 1",
            });
        }
        if self.frame_sets == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_sets",
                reason: "must be at least 1",
            });
        }
        let (lo, hi) = self.gap_range;
        if !(lo.is_finite() && hi.is_finite() && (hi - lo).is_finite()) {
            return Err(ConfigError::Invalid {
                field: "gap_range",
                reason: "bounds and their span must be finite",
            });
        }
        if lo >= hi {
            return Err(ConfigError::Invalid {
                field: "gap_range",
                reason: "lower bound must be below upper bound",
            });
        }
        if self.max_delta < 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_delta",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}
