use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flappy_maps::assets::{FrameSet, Image};
use flappy_maps::geom::Size;
use flappy_maps::state::Action;
use flappy_maps::theme::Theme;
use flappy_maps::{GameEvent, GameState, Phase, Settings};

const OBSTACLE: Size = Size::new(52.0, 320.0);

fn frames(set: usize) -> FrameSet {
    FrameSet::new(set, vec![Image::new(34, 24); 4]).unwrap()
}

fn ready_state(seed: u64) -> GameState {
    let (mut state, req) = GameState::new(Settings::default(), OBSTACLE, seed);
    state.complete_restart(req.generation, frames(req.set));
    assert!(state.is_ready());
    state
}

fn at(secs: f64) -> Duration {
    Duration::from_secs_f64(secs)
}

/// Park the actor in the middle of the next gap it has to pass.
fn steer(state: &mut GameState) {
    let target = state.obstacles.iter().find(|p| !p.scored).map(|p| p.gap_y);
    if let Some(gap_y) = target {
        state.actor.y = gap_y + 150.0;
        state.actor.vel = 0.0;
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn second_pair_spawns_after_interval() {
    let mut state = ready_state(1);
    assert_eq!(state.primary_action(at(0.0)), Action::Started);
    assert_eq!(state.obstacles.len(), 1);

    state.tick(Duration::from_millis(3499), 0.0);
    assert_eq!(state.obstacles.len(), 1);

    state.tick(Duration::from_millis(3501), 0.0);
    assert_eq!(state.obstacles.len(), 2);
}

#[test]
fn nothing_spawns_before_start() {
    let mut state = ready_state(2);
    for i in 0..100 {
        state.tick(at(i as f64), 0.0);
    }
    assert!(state.obstacles.is_empty());
    assert_eq!(state.phase(), Phase::NotStarted);
}

#[test]
fn queue_never_exceeds_capacity() {
    let mut state = ready_state(3);
    state.primary_action(at(0.0));
    let mut t = 0.0;
    while t < 30.0 {
        t += 0.5;
        // Freeze motion so no pair is ever passed or hit.
        state.tick(at(t), 0.0);
        assert!(state.obstacles.len() <= 4);
    }
    assert_eq!(state.obstacles.len(), 4);
    let spawned: Vec<Duration> = state.obstacles.iter().map(|p| p.spawned_at).collect();
    let mut sorted = spawned.clone();
    sorted.sort();
    assert_eq!(spawned, sorted);
}

// ── Scoring and themes ────────────────────────────────────────────────────────

#[test]
fn theme_advances_every_five_points() {
    let mut state = ready_state(4);
    state.primary_action(at(0.0));

    let dt = 0.01;
    let mut t = 0.0;
    let mut score_at_change = Vec::new();
    while state.score() < 16 && t < 120.0 {
        t += dt;
        steer(&mut state);
        for event in state.tick(at(t), dt) {
            match event {
                GameEvent::ThemeChanged(theme) => score_at_change.push((state.score(), theme)),
                GameEvent::Collided { .. } => panic!("collided at t={t:.2}"),
                _ => {}
            }
        }
    }
    assert_eq!(
        score_at_change,
        vec![(5, Theme::Map1), (10, Theme::Map2), (15, Theme::Windowex)]
    );
    assert_eq!(state.theme().index(), 3);
}

#[test]
fn score_counts_passed_pairs_once() {
    let mut state = ready_state(5);
    state.primary_action(at(0.0));

    let dt = 0.02;
    let mut t = 0.0;
    let mut scored_events = 0;
    let mut last_score = 0;
    while t < 40.0 {
        t += dt;
        steer(&mut state);
        let before: HashMap<Duration, bool> =
            state.obstacles.iter().map(|p| (p.spawned_at, p.scored)).collect();
        let actor_left = state.actor.rect().x;

        for event in state.tick(at(t), dt) {
            if let GameEvent::Scored { score } = event {
                scored_events += 1;
                assert_eq!(score, scored_events);
            }
        }

        for pair in state.obstacles.iter() {
            if let Some(&was) = before.get(&pair.spawned_at) {
                // Never un-scored, and only scored once strictly past the actor.
                assert!(!(was && !pair.scored));
                if !was && pair.scored {
                    assert!(pair.x + OBSTACLE.w < actor_left);
                }
            }
        }
        assert!(state.score() >= last_score);
        last_score = state.score();
    }
    assert!(state.score() > 5);
    assert_eq!(state.score(), scored_events);
}

// ── Collision and the two-phase end ───────────────────────────────────────────

/// A y that puts the actor inside one of the barriers around `gap_y`.
fn barrier_y(gap_y: f64) -> f64 {
    if gap_y >= 60.0 { gap_y - 60.0 } else { gap_y + 360.0 }
}

/// Hold the actor inside the next pair until the run ends. Returns the
/// events of the colliding tick.
fn crash(state: &mut GameState, t: &mut f64) -> Vec<GameEvent> {
    loop {
        assert!(*t < 20.0, "never collided");
        *t += 0.01;
        if let Some(gap_y) = state.obstacles.iter().find(|p| !p.scored).map(|p| p.gap_y) {
            state.actor.y = barrier_y(gap_y);
            state.actor.vel = 0.0;
        }
        let events = state.tick(at(*t), 0.01);
        if state.phase() == Phase::Ended {
            return events;
        }
    }
}

fn settle(state: &mut GameState, t: &mut f64) {
    while !state.end_screen_showing() {
        assert!(*t < 40.0, "never settled");
        *t += 0.01;
        state.tick(at(*t), 0.01);
    }
}

#[test]
fn collision_ends_run_then_actor_settles() {
    let mut state = ready_state(6);
    state.primary_action(at(0.0));

    let mut t = 0.0;
    let events = crash(&mut state, &mut t);
    assert!(events.contains(&GameEvent::Collided { score: 0 }));
    assert!(!state.end_screen_showing());
    assert!(!state.actor.trigger_impulse(state.phase()));

    let positions: Vec<f64> = state.obstacles.iter().map(|p| p.x).collect();
    let mut settled_events = 0;
    let mut last_y = state.actor.y;
    for _ in 0..500 {
        t += 0.01;
        let events = state.tick(at(t), 0.01);
        settled_events += events.iter().filter(|e| **e == GameEvent::Settled).count();
        assert!(state.actor.y >= last_y);
        last_y = state.actor.y;
    }
    assert_eq!(settled_events, 1);
    assert!(state.is_settled());
    assert!(state.end_screen_showing());
    assert_eq!(state.actor.y, 512.0 - 24.0);
    assert_eq!(state.actor.vel, 0.0);

    // Obstacles froze at the moment of the collision.
    let after: Vec<f64> = state.obstacles.iter().map(|p| p.x).collect();
    assert_eq!(positions, after);

    state.tick(at(t + 10.0), 0.05);
    assert_eq!(state.actor.y, 488.0);
    assert_eq!(state.actor.vel, 0.0);
}

#[test]
fn restart_returns_to_not_started_once_frames_load() {
    let mut state = ready_state(7);
    state.primary_action(at(0.0));
    let mut t = 0.0;
    crash(&mut state, &mut t);

    let Action::Restart(first) = state.primary_action(at(t)) else {
        panic!("expected a restart");
    };
    assert_eq!(state.phase(), Phase::NotStarted);
    assert_eq!(state.score(), 0);
    assert_eq!(state.theme(), Theme::Day);
    assert!(state.obstacles.is_empty());
    assert!(!state.is_ready());
    assert_eq!(state.primary_action(at(t)), Action::Ignored);

    // A second restart supersedes the first; its late load is dropped.
    let second = state.begin_restart();
    assert_eq!(state.complete_restart(first.generation, frames(first.set)), None);
    assert!(!state.is_ready());
    assert_eq!(
        state.complete_restart(second.generation, frames(second.set)),
        Some(GameEvent::Restarted)
    );
    assert!(state.is_ready());
    assert_eq!(state.actor.y, 200.0);
    assert_eq!(state.primary_action(at(t + 1.0)), Action::Started);
}

#[test]
fn restart_click_only_hits_the_button() {
    let mut state = ready_state(8);
    state.primary_action(at(0.0));
    let mut t = 0.0;
    crash(&mut state, &mut t);
    settle(&mut state, &mut t);

    let button = Size::new(100.0, 30.0);
    let r = state.restart_button_rect(button);
    assert_eq!(r.x, 144.0 - 50.0);
    assert_eq!(r.y, 312.0 + 100.0);
    assert!(state.restart_click(r.x - 1.0, r.y, button).is_none());
    assert_eq!(state.phase(), Phase::Ended);
    assert!(state.restart_click(r.x + r.w, r.y + r.h, button).is_some());
    assert_eq!(state.phase(), Phase::NotStarted);
}

// ── Invariants under random play ──────────────────────────────────────────────

#[test]
fn invariants_hold_under_random_input() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = ready_state(seed);
        let floor = state.settings().playfield_height;
        let mut t = 0.0;
        let mut last_score = 0;

        for _ in 0..3000 {
            let dt = rng.random_range(0.0..0.05);
            t += dt;
            if rng.random_bool(0.08) {
                if let Action::Restart(req) = state.primary_action(at(t)) {
                    state.complete_restart(req.generation, frames(req.set));
                    last_score = 0;
                }
            }
            state.tick(at(t), dt);

            let max_y = floor - state.actor.frame_height();
            assert!(state.actor.y >= 0.0 && state.actor.y <= max_y, "y={}", state.actor.y);
            if state.actor.y == 0.0 || state.actor.y == max_y {
                assert_eq!(state.actor.vel, 0.0);
            }
            assert!(state.obstacles.len() <= 4);
            assert!(state.score() >= last_score);
            last_score = state.score();
            assert_eq!(
                state.theme(),
                Theme::for_score(state.score(), state.settings().points_per_theme)
            );
        }
    }
}
