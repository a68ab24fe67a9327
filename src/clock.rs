use std::time::Duration;

/// Turns a stream of frame timestamps into per-frame deltas (seconds).
#[derive(Clone, Debug, Default)]
pub struct Clock {
    last: Option<Duration>,
    max_delta: f64,
}

impl Clock {
    /// `max_delta` of 0 disables the cap.
    pub fn new(max_delta: f64) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Forget the previous timestamp so the next tick reports 0.
    pub fn restart(&mut self) {
        self.last = None;
    }

    /// Last observed timestamp.
    pub fn now(&self) -> Duration {
        self.last.unwrap_or_default()
    }

    pub fn tick(&mut self, now: Duration) -> f64 {
        let delta = match self.last {
            Some(prev) => now.saturating_sub(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(self.last.map_or(now, |prev| prev.max(now)));
        if self.max_delta > 0.0 {
            delta.min(self.max_delta)
        } else {
            delta
        }
    }
}
