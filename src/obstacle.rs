//! The stream of obstacle pairs scrolling toward the actor.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

use crate::config::Settings;
use crate::geom::{Rect, Size};

/// An upper and lower barrier around one gap.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstaclePair {
    pub x: f64,
    /// Reference line the two barriers are offset from.
    pub gap_y: f64,
    pub scored: bool,
    pub spawned_at: Duration,
}

/// Barrier drawn upright below the gap.
pub fn upper_rect(pair: &ObstaclePair, size: Size, offset: f64) -> Rect {
    Rect::new(pair.x, pair.gap_y + offset, size.w, size.h)
}

/// Barrier drawn flipped above the gap.
pub fn lower_rect(pair: &ObstaclePair, size: Size, offset: f64) -> Rect {
    Rect::new(pair.x, pair.gap_y - offset, size.w, size.h)
}

/// Pick a gap reference uniformly from the configured band.
pub fn random_gap(rng: &mut impl Rng, settings: &Settings) -> f64 {
    let (lo, hi) = settings.gap_range;
    settings.gap_base + rng.random_range(lo..hi) * settings.gap_step
}

/// Spawn-ordered queue of live obstacle pairs (oldest first).
#[derive(Clone, Debug)]
pub struct ObstacleStream {
    pairs: VecDeque<ObstaclePair>,
    last_spawn: Option<Duration>,
    interval: Duration,
    capacity: usize,
    spawn_x: f64,
    speed: f64,
}

impl ObstacleStream {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pairs: VecDeque::with_capacity(settings.obstacle_capacity + 1),
            last_spawn: None,
            interval: Duration::from_millis(settings.spawn_interval_ms),
            capacity: settings.obstacle_capacity,
            spawn_x: settings.canvas_width,
            speed: settings.obstacle_speed,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObstaclePair> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ObstaclePair> {
        self.pairs.iter_mut()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.last_spawn = None;
    }

    /// Strictly more than one interval has passed since the last spawn.
    pub fn spawn_due(&self, now: Duration) -> bool {
        match self.last_spawn {
            Some(last) => now.saturating_sub(last) > self.interval,
            None => true,
        }
    }

    /// Append a pair at the right edge and restart the spawn timer.
    pub fn spawn(&mut self, now: Duration, gap_y: f64) {
        self.pairs.push_back(ObstaclePair {
            x: self.spawn_x,
            gap_y,
            scored: false,
            spawned_at: now,
        });
        self.last_spawn = Some(now);
        log::debug!("Spawned obstacle pair at gap {gap_y:.1} ({} live)", self.pairs.len());
    }

    /// Drop the oldest pairs until the queue fits. Returns what was evicted.
    pub fn enforce_capacity(&mut self) -> Vec<ObstaclePair> {
        let mut evicted = Vec::new();
        while self.pairs.len() > self.capacity {
            if let Some(old) = self.pairs.pop_front() {
                evicted.push(old);
            }
        }
        evicted
    }

    pub fn advect(&mut self, delta: f64) {
        let dx = self.speed * delta;
        for pair in &mut self.pairs {
            pair.x -= dx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn rects_straddle_the_gap() {
        let pair = ObstaclePair {
            x: 50.0,
            gap_y: 200.0,
            scored: false,
            spawned_at: ms(0),
        };
        let size = Size::new(52.0, 320.0);
        assert_eq!(upper_rect(&pair, size, 340.0), Rect::new(50.0, 540.0, 52.0, 320.0));
        assert_eq!(lower_rect(&pair, size, 340.0), Rect::new(50.0, -140.0, 52.0, 320.0));
    }

    #[test]
    fn spawn_interval_is_strict() {
        let mut stream = ObstacleStream::new(&Settings::default());
        assert!(stream.spawn_due(ms(0)));
        stream.spawn(ms(0), 100.0);
        assert!(!stream.spawn_due(ms(3499)));
        assert!(!stream.spawn_due(ms(3500)));
        assert!(stream.spawn_due(ms(3501)));
    }

    #[test]
    fn evicts_oldest_first() {
        let mut stream = ObstacleStream::new(&Settings::default());
        for i in 0..6u64 {
            stream.spawn(ms(i * 4000), i as f64);
            let evicted = stream.enforce_capacity();
            assert!(stream.len() <= 4);
            if i >= 4 {
                assert_eq!(evicted.len(), 1);
                let oldest_left = stream.iter().map(|p| p.spawned_at).min().unwrap();
                assert!(evicted[0].spawned_at < oldest_left);
            }
        }
        let order: Vec<f64> = stream.iter().map(|p| p.gap_y).collect();
        assert_eq!(order, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn advection_moves_left() {
        let mut stream = ObstacleStream::new(&Settings::default());
        stream.spawn(ms(0), 0.0);
        stream.advect(0.5);
        assert_eq!(stream.iter().next().unwrap().x, 288.0 - 50.0);
    }

    #[test]
    fn gap_stays_in_band() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let g = random_gap(&mut rng, &settings);
            assert!((-50.0..200.0).contains(&g), "{g}");
        }
    }

    #[test]
    fn clear_resets_timer() {
        let mut stream = ObstacleStream::new(&Settings::default());
        stream.spawn(ms(10), 0.0);
        stream.clear();
        assert!(stream.is_empty());
        assert!(stream.spawn_due(ms(11)));
    }
}
