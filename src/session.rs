//! Ties the clock, the asset loader and the game state together.
//!
//! The frame loop calls [`Session::update`] once per frame. Nothing is
//! simulated until every image for the first frame has loaded; the first
//! tick after that is the first observable frame and sees a delta of 0.

use std::task::Poll;
use std::time::Duration;

use crate::actor::FrameRequest;
use crate::assets::{AssetKey, AssetStore, FrameSet, ImageSource, Loader, Pending};
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::LoadError;
use crate::state::{Action, GameEvent, GameState};

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading,
    Ready,
    /// A load failed; the game stays on the failure screen.
    Failed(LoadError),
}

struct FrameLoad {
    generation: u64,
    pending: Pending<FrameSet>,
}

pub struct Session {
    settings: Settings,
    seed: u64,
    clock: Clock,
    assets: AssetStore,
    game: Option<GameState>,
    frames: Option<FrameLoad>,
    failure: Option<LoadError>,
}

impl Session {
    pub fn new(mut settings: Settings, source: impl ImageSource, seed: u64) -> Self {
        if let Some(offered) = source.frame_sets() {
            if settings.frame_sets > offered {
                log::warn!(
                    "Source offers {offered} frame sets, using those instead of {}",
                    settings.frame_sets
                );
                settings.frame_sets = offered.max(1);
            }
        }
        let loader = Loader::new(source);
        Self {
            clock: Clock::new(settings.max_delta),
            assets: AssetStore::new(loader),
            settings,
            seed,
            game: None,
            frames: None,
            failure: None,
        }
    }

    pub fn status(&self) -> Status {
        if let Some(e) = &self.failure {
            return Status::Failed(e.clone());
        }
        match &self.game {
            Some(game) if game.is_ready() => Status::Ready,
            _ => Status::Loading,
        }
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Poll outstanding loads, then run one simulation tick if ready.
    pub fn update(&mut self, now: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.failure.is_some() {
            return events;
        }
        if let Some(e) = self.assets.poll() {
            self.failure = Some(e.clone());
            return events;
        }

        if self.game.is_none() && self.assets.is_ready() {
            if let Some(size) = self.assets.obstacle_size() {
                let (game, request) = GameState::new(self.settings.clone(), size, self.seed);
                self.game = Some(game);
                self.request_frames(request);
            }
        }

        if let Some(event) = self.poll_frames() {
            events.push(event);
        }

        match self.game.as_mut() {
            Some(game) if game.is_ready() => {
                let delta = self.clock.tick(now);
                events.extend(game.tick(self.clock.now(), delta));
            }
            _ => self.clock.restart(),
        }
        if let Some(game) = &self.game {
            self.assets.want_background(game.theme());
        }
        events
    }

    pub fn primary_action(&mut self) -> Option<GameEvent> {
        let now = self.clock.now();
        let game = self.game.as_mut()?;
        match game.primary_action(now) {
            Action::Ignored => None,
            Action::Started => Some(GameEvent::Started),
            Action::Flapped => Some(GameEvent::Flapped),
            Action::Restart(request) => {
                self.request_frames(request);
                None
            }
        }
    }

    /// Click at world coordinates.
    pub fn click(&mut self, x: f64, y: f64) {
        let Some(button) = self.assets.get(AssetKey::RestartButton).map(|b| b.size()) else {
            return;
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if let Some(request) = game.restart_click(x, y, button) {
            self.request_frames(request);
        }
    }

    /// Start loading a frame set. Any older load is dropped; if it was
    /// already delivered the generation check in the game rejects it.
    fn request_frames(&mut self, request: FrameRequest) {
        let pending = self.assets.loader().frame_set(request.set);
        self.frames = Some(FrameLoad {
            generation: request.generation,
            pending,
        });
    }

    fn poll_frames(&mut self) -> Option<GameEvent> {
        let load = self.frames.as_ref()?;
        let result = match load.pending.poll() {
            Poll::Pending => return None,
            Poll::Ready(result) => result,
        };
        let generation = load.generation;
        self.frames = None;
        match result {
            Ok(frames) => self.game.as_mut()?.complete_restart(generation, frames),
            Err(e) => {
                log::error!("Frame set load failed: {e}");
                self.failure = Some(e);
                None
            }
        }
    }
}
