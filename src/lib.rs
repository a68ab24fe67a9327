//! Flappy Maps - a gap-dodging arcade game for the terminal
//!
//! Core modules:
//! - `state`: game state machine and the per-tick simulation
//! - `actor`, `obstacle`, `collision`: the pieces the tick drives
//! - `clock`: frame timestamps to deltas
//! - `assets`: images and the background loader
//! - `session`: wires loading, timing and the game together
//! - `render`: half-block terminal renderer
//! - `audio`: synthesized sound cues

pub mod actor;
pub mod assets;
pub mod audio;
pub mod clock;
pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod geom;
pub mod obstacle;
pub mod render;
pub mod session;
pub mod state;
pub mod theme;

pub use config::Settings;
pub use error::{ConfigError, GameError, LoadError};
pub use session::{Session, Status};
pub use state::{GameEvent, GameState, Phase};
