//! Synthesized sound cues.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use crate::state::GameEvent;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    Death,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Started | GameEvent::Flapped => Some(Cue::Flap),
            GameEvent::Scored { .. } => Some(Cue::Score),
            GameEvent::Collided { .. } => Some(Cue::Death),
            _ => None,
        }
    }
}

/// Render a cue to mono samples.
pub fn synth(cue: Cue) -> Vec<f32> {
    let (mut unit, secs): (Box<dyn AudioUnit>, f32) = match cue {
        // Rising chirp
        Cue::Flap => {
            let freq = lfo(|t: f32| lerp(300.0, 700.0, (t / 0.08).min(1.0)));
            let gain = lfo(|t: f32| lerp(0.12, 0.0, (t / 0.1).min(1.0)));
            (Box::new((freq >> sine::<f32>()) * gain) as Box<dyn AudioUnit>, 0.1)
        }
        // Two-tone blip
        Cue::Score => {
            let freq = lfo(|t: f32| if t < 0.06 { 880.0f32 } else { 1320.0 });
            let gain = lfo(|t: f32| lerp(0.1, 0.0, (t / 0.15).min(1.0)));
            (Box::new((freq >> square()) * gain) as Box<dyn AudioUnit>, 0.15)
        }
        // Falling saw sweep (400Hz to 80Hz over 0.4s)
        Cue::Death => {
            let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
            let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
            (Box::new((freq >> saw()) * gain) as Box<dyn AudioUnit>, 0.5)
        }
    };
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * secs).round() as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

/// Audio output. Without a usable device every cue is silently dropped.
pub struct Sfx {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Sfx {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            log::info!("Sound disabled");
            return Self::silent();
        }
        match OutputStream::try_default() {
            Ok(output) => Self {
                output: Some(output),
            },
            Err(e) => {
                log::warn!("No audio output, continuing without sound: {e}");
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self { output: None }
    }

    pub fn play(&self, cue: Cue) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Cannot play {cue:?}: {e}");
                return;
            }
        };
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, synth(cue)));
        sink.detach(); // Play in background
    }

    pub fn handle_events(&self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(Cue::for_event) {
            self.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_have_expected_lengths() {
        assert_eq!(synth(Cue::Flap).len(), 4410);
        assert_eq!(synth(Cue::Death).len(), 22050);
    }

    #[test]
    fn death_fades_out() {
        let samples = synth(Cue::Death);
        let head = samples[..2000].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail = samples[samples.len() - 200..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(head > tail);
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn events_map_to_cues() {
        assert_eq!(Cue::for_event(&GameEvent::Flapped), Some(Cue::Flap));
        assert_eq!(Cue::for_event(&GameEvent::Scored { score: 3 }), Some(Cue::Score));
        assert_eq!(Cue::for_event(&GameEvent::Settled), None);
    }
}
