//! The player character: vertical physics plus a looping frame animation.

use rand::Rng;

use crate::assets::{FrameSet, Image};
use crate::config::Settings;
use crate::geom::Rect;
use crate::state::Phase;

/// Ask for a frame set to be loaded for reset number `generation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    pub generation: u64,
    pub set: usize,
}

#[derive(Clone, Debug)]
pub struct Actor {
    x: f64,
    start_y: f64,
    floor: f64,
    gravity: f64,
    impulse: f64,
    animation_rate: f64,
    frame_sets: usize,

    pub y: f64,
    pub vel: f64,
    cursor: f64,
    frames: Option<FrameSet>,
    generation: u64,
    installed: Option<u64>,
}

impl Actor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            x: settings.actor_x,
            start_y: settings.actor_start_y,
            floor: settings.playfield_height,
            gravity: settings.gravity,
            impulse: settings.impulse,
            animation_rate: settings.animation_rate,
            frame_sets: settings.frame_sets,
            y: settings.actor_start_y,
            vel: 0.0,
            cursor: 0.0,
            frames: None,
            generation: 0,
            installed: None,
        }
    }

    /// Frames for the latest reset have been installed.
    pub fn is_ready(&self) -> bool {
        self.frames.is_some() && self.installed == Some(self.generation)
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn frame_set(&self) -> Option<&FrameSet> {
        self.frames.as_ref()
    }

    /// Image for the current animation step.
    pub fn frame(&self) -> Option<&Image> {
        self.frames
            .as_ref()
            .map(|set| set.frame(self.cursor.floor() as usize))
    }

    pub fn frame_height(&self) -> f64 {
        self.frame().map_or(0.0, |f| f.height() as f64)
    }

    pub fn rect(&self) -> Rect {
        let (w, h) = self
            .frame()
            .map_or((0.0, 0.0), |f| (f.width() as f64, f.height() as f64));
        Rect::new(self.x, self.y, w, h)
    }

    /// Nose-up/nose-down angle in radians: 8 degrees per 400 units/s.
    pub fn tilt(&self) -> f64 {
        (8.0 * self.vel / 400.0).to_radians()
    }

    pub fn update(&mut self, delta: f64, phase: Phase, floor: f64) {
        let len = self.frames.as_ref().map_or(0, FrameSet::len);
        self.cursor += delta * self.animation_rate;
        if self.cursor >= len as f64 {
            self.cursor = 0.0;
        }

        if matches!(phase, Phase::Running | Phase::Ended) {
            self.vel += self.gravity * delta;
            self.y += self.vel * delta;
            self.clamp(floor);
        }
    }

    fn clamp(&mut self, floor: f64) {
        let max_y = (floor - self.frame_height()).max(0.0);
        if self.y < 0.0 {
            self.y = 0.0;
            self.vel = 0.0;
        }
        if self.y > max_y {
            self.y = max_y;
            self.vel = 0.0;
        }
    }

    /// The player's only control. Applies only while a run is in progress.
    pub fn trigger_impulse(&mut self, phase: Phase) -> bool {
        if phase != Phase::Running {
            return false;
        }
        self.vel = self.impulse;
        true
    }

    /// Back to the start position, and pick a new frame set at random.
    /// The current frames stay on screen until [`Actor::install_frames`]
    /// delivers the new set.
    pub fn reset(&mut self, rng: &mut impl Rng) -> FrameRequest {
        self.y = self.start_y;
        self.vel = 0.0;
        self.cursor = 0.0;
        self.generation += 1;
        FrameRequest {
            generation: self.generation,
            set: rng.random_range(0..self.frame_sets.max(1)),
        }
    }

    /// Install frames loaded for `generation`. Loads for an older reset are
    /// dropped and `false` is returned.
    pub fn install_frames(&mut self, generation: u64, frames: FrameSet) -> bool {
        if generation != self.generation || frames.is_empty() {
            return false;
        }
        self.frames = Some(frames);
        self.installed = Some(generation);
        self.cursor = 0.0;
        // The start position is only known to fit once the frame height is.
        self.clamp(self.floor);
        true
    }
}
