//! Game state and the per-tick simulation.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::actor::{Actor, FrameRequest};
use crate::assets::FrameSet;
use crate::collision;
use crate::config::Settings;
use crate::geom::{Rect, Size};
use crate::obstacle::{ObstacleStream, random_gap};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Actor hovers, waiting for the first input
    NotStarted,
    Running,
    /// Collision happened; the actor keeps falling until it settles
    Ended,
}

/// Things that happened during a tick or input, for sound and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { score: u32 },
    ThemeChanged(Theme),
    Collided { score: u32 },
    /// The actor came to rest on the floor after a collision
    Settled,
    /// A restart finished loading and the game is ready again
    Restarted,
}

/// Outcome of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ignored,
    Started,
    Flapped,
    /// Restart begun; the caller must load this frame set and hand it to
    /// [`GameState::complete_restart`].
    Restart(FrameRequest),
}

pub struct GameState {
    settings: Settings,
    obstacle_size: Size,
    pub actor: Actor,
    pub obstacles: ObstacleStream,
    score: u32,
    phase: Phase,
    theme: Theme,
    ground_offset: f64,
    settled: bool,
    rng: StdRng,
}

impl GameState {
    /// A game waiting for its first frame set. Resolve the returned request
    /// with [`GameState::complete_restart`] before the first tick.
    pub fn new(settings: Settings, obstacle_size: Size, seed: u64) -> (Self, FrameRequest) {
        let mut state = Self {
            actor: Actor::new(&settings),
            obstacles: ObstacleStream::new(&settings),
            settings,
            obstacle_size,
            score: 0,
            phase: Phase::NotStarted,
            theme: Theme::Day,
            ground_offset: 0.0,
            settled: false,
            rng: StdRng::seed_from_u64(seed),
        };
        let request = state.actor.reset(&mut state.rng);
        (state, request)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn ground_offset(&self) -> f64 {
        self.ground_offset
    }

    pub fn obstacle_size(&self) -> Size {
        self.obstacle_size
    }

    /// Frames for the latest reset are installed; input and ticks are live.
    pub fn is_ready(&self) -> bool {
        self.actor.is_ready()
    }

    /// The actor rests on the floor.
    pub fn is_settled(&self) -> bool {
        self.actor.y + self.actor.frame_height() >= self.settings.playfield_height
    }

    /// Game over panel and restart button are visible.
    pub fn end_screen_showing(&self) -> bool {
        self.phase == Phase::Ended && self.is_settled()
    }

    /// Hit box of the restart button, given the button image size.
    pub fn restart_button_rect(&self, button: Size) -> Rect {
        Rect::new(
            self.settings.canvas_width / 2.0 - button.w / 2.0,
            self.settings.canvas_height() / 2.0 + 100.0,
            button.w,
            button.h,
        )
    }

    /// Space, click or tap: start, flap, or restart depending on the phase.
    pub fn primary_action(&mut self, now: Duration) -> Action {
        if !self.is_ready() {
            return Action::Ignored;
        }
        match self.phase {
            Phase::NotStarted => {
                self.phase = Phase::Running;
                let gap = random_gap(&mut self.rng, &self.settings);
                self.obstacles.spawn(now, gap);
                self.actor.trigger_impulse(self.phase);
                log::info!("Run started");
                Action::Started
            }
            Phase::Running => {
                self.actor.trigger_impulse(self.phase);
                Action::Flapped
            }
            Phase::Ended => Action::Restart(self.begin_restart()),
        }
    }

    /// Click at world coordinates; only the restart button reacts, and only
    /// once the end screen is up.
    pub fn restart_click(&mut self, x: f64, y: f64, button: Size) -> Option<FrameRequest> {
        if !self.end_screen_showing() || !self.restart_button_rect(button).contains(x, y) {
            return None;
        }
        Some(self.begin_restart())
    }

    /// Back to not-started with an empty field. The restart completes when
    /// the returned frame set is installed.
    pub fn begin_restart(&mut self) -> FrameRequest {
        self.phase = Phase::NotStarted;
        self.score = 0;
        self.theme = Theme::Day;
        self.ground_offset = 0.0;
        self.settled = false;
        self.obstacles.clear();
        let request = self.actor.reset(&mut self.rng);
        log::info!(
            "Restart requested (generation {}, frame set {})",
            request.generation,
            request.set
        );
        request
    }

    /// Install a loaded frame set. Returns `None` for loads that belong to a
    /// superseded reset.
    pub fn complete_restart(&mut self, generation: u64, frames: FrameSet) -> Option<GameEvent> {
        if self.actor.install_frames(generation, frames) {
            log::info!("Ready (generation {generation})");
            Some(GameEvent::Restarted)
        } else {
            log::debug!("Dropped stale frame set for generation {generation}");
            None
        }
    }

    /// Advance the simulation by `delta` seconds. `now` is the wall clock
    /// used for spawning.
    pub fn tick(&mut self, now: Duration, delta: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_ready() {
            return events;
        }

        self.actor
            .update(delta, self.phase, self.settings.playfield_height);

        if self.phase != Phase::Ended {
            self.obstacles.advect(delta);
            let eval = collision::evaluate(
                &self.actor.rect(),
                self.obstacles.iter_mut(),
                self.obstacle_size,
                self.settings.obstacle_offset,
            );
            for _ in 0..eval.passed {
                self.award_point(&mut events);
            }
            if eval.collided {
                self.phase = Phase::Ended;
                log::info!("Collision, final score {}", self.score);
                events.push(GameEvent::Collided { score: self.score });
            }
        }

        if self.phase == Phase::Running {
            if self.obstacles.spawn_due(now) {
                let gap = random_gap(&mut self.rng, &self.settings);
                self.obstacles.spawn(now, gap);
            }
            self.obstacles.enforce_capacity();

            self.ground_offset -= delta * self.settings.obstacle_speed;
            while self.ground_offset <= -self.settings.ground_period {
                self.ground_offset += self.settings.ground_period;
            }
        }

        if self.phase == Phase::Ended && !self.settled && self.is_settled() {
            self.settled = true;
            log::debug!("Actor settled");
            events.push(GameEvent::Settled);
        }
        events
    }

    fn award_point(&mut self, events: &mut Vec<GameEvent>) {
        self.score += 1;
        log::debug!("Score {}", self.score);
        events.push(GameEvent::Scored { score: self.score });
        let theme = Theme::for_score(self.score, self.settings.points_per_theme);
        if theme != self.theme {
            self.theme = theme;
            log::info!("Theme changed to {theme}");
            events.push(GameEvent::ThemeChanged(theme));
        }
    }
}
