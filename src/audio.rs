//! Procedural sound effects.
//!
//! Each cue is a tiny patch: one or two oscillators summed into a single gain stage
//! that decays exponentially. Sounds are fire-and-forget; the backend schedules the
//! start, the decay and the stop up front so nothing needs cleaning up later.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency_hz: f32,
}

/// Oscillators sharing one gain envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    pub tones: &'static [Tone],
    pub gain: f32,
    /// Time (s) for the gain to ramp down to silence; oscillators stop then too.
    pub decay_s: f64,
}

/// Gain target for the exponential ramp (cannot ramp to exactly zero).
pub const SILENCE: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Shoot,
    Hit,
    Miss,
}

impl Cue {
    pub fn patch(self) -> Patch {
        match self {
            Cue::Shoot => Patch {
                tones: &[Tone { waveform: Waveform::Square, frequency_hz: 900.0 }],
                gain: 0.12,
                decay_s: 0.08,
            },
            // Two voices so a hit sounds fuller than the shot or the miss.
            Cue::Hit => Patch {
                tones: &[
                    Tone { waveform: Waveform::Sawtooth, frequency_hz: 520.0 },
                    Tone { waveform: Waveform::Sine, frequency_hz: 320.0 },
                ],
                gain: 0.16,
                decay_s: 0.22,
            },
            Cue::Miss => Patch {
                tones: &[Tone { waveform: Waveform::Sine, frequency_hz: 220.0 }],
                gain: 0.08,
                decay_s: 0.12,
            },
        }
    }
}

/// Something that can play the gallery's sound cues.
pub trait Sfx {
    fn play(&mut self, cue: Cue);

    fn play_shoot(&mut self) {
        self.play(Cue::Shoot);
    }

    fn play_hit(&mut self) {
        self.play(Cue::Hit);
    }

    fn play_miss(&mut self) {
        self.play(Cue::Miss);
    }
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Sfx for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// An audio output that can render patches.
pub trait AudioBackend: Sized {
    fn open() -> Result<Self, AudioError>;
    fn schedule(&self, patch: &Patch) -> Result<(), AudioError>;
}

enum BackendState<B> {
    Unopened,
    Ready(B),
    Disabled,
}

/// Lazily opened synthesizer. The backend is created on the first cue; if that
/// fails the synth stays disabled for the rest of the session and every later cue
/// is a no-op. Nothing is reported to the caller.
pub struct Synth<B: AudioBackend = AudioContext> {
    state: BackendState<B>,
}

impl<B: AudioBackend> Synth<B> {
    pub fn new() -> Self {
        Self { state: BackendState::Unopened }
    }

    /// A synth that never opens a backend.
    pub fn muted() -> Self {
        Self { state: BackendState::Disabled }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, BackendState::Disabled)
    }

    fn backend(&mut self) -> Option<&B> {
        if let BackendState::Unopened = self.state {
            self.state = match B::open() {
                Ok(backend) => BackendState::Ready(backend),
                Err(err) => {
                    log::debug!("sound disabled: {}", err);
                    BackendState::Disabled
                }
            };
        }
        match &self.state {
            BackendState::Ready(backend) => Some(backend),
            _ => None,
        }
    }
}

impl<B: AudioBackend> Default for Synth<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AudioBackend> Sfx for Synth<B> {
    fn play(&mut self, cue: Cue) {
        if let Some(backend) = self.backend() {
            if let Err(err) = backend.schedule(&cue.patch()) {
                log::debug!("{:?} dropped: {}", cue, err);
            }
        }
    }
}

impl From<Waveform> for OscillatorType {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }
}

impl AudioBackend for AudioContext {
    fn open() -> Result<Self, AudioError> {
        AudioContext::new().map_err(AudioError::unavailable)
    }

    fn schedule(&self, patch: &Patch) -> Result<(), AudioError> {
        let now = self.current_time();
        let end = now + patch.decay_s;

        let gain = GainNode::new(self).map_err(AudioError::schedule)?;
        gain.gain().set_value(patch.gain);
        gain.connect_with_audio_node(&self.destination())
            .map_err(AudioError::schedule)?;

        for tone in patch.tones {
            let osc = OscillatorNode::new(self).map_err(AudioError::schedule)?;
            osc.set_type(tone.waveform.into());
            osc.frequency().set_value(tone.frequency_hz);
            osc.connect_with_audio_node(&gain).map_err(AudioError::schedule)?;
            osc.start().map_err(AudioError::schedule)?;
            osc.stop_with_when(end).map_err(AudioError::schedule)?;
        }

        gain.gain()
            .exponential_ramp_to_value_at_time(SILENCE, end)
            .map_err(AudioError::schedule)?;
        Ok(())
    }
}
