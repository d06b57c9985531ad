//! Guitar strummer
//!
//! Turns a chord name into six timed string events fed through the keyed
//! player's callback queue. Each string is a key (its index, low E = 0), so
//! restriking a string retires whatever it was still ringing.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::keyed::{mute_key, KeyedPlayer};
use super::scheduler::Callback;
use crate::error::{Error, Result};
use crate::pitch::{Pitch, PitchClass};
use crate::signal::{Duration, Frame, Pluck, SharedNote, Source};

/// Number of strings
pub const STRINGS: usize = 6;

/// Fret positions, low E string first; `None` means the string is not played
pub type Frets = [Option<u8>; STRINGS];

/// Open-string frequencies in Hz, low E string first
pub type Tuning = [f32; STRINGS];

const CHORDS: &[(&str, Frets)] = &[
    ("C", [Some(0), Some(3), Some(2), Some(0), Some(1), Some(0)]),
    ("Cm", [Some(0), Some(0), Some(5), Some(5), Some(4), Some(3)]),
    ("D", [None, Some(0), Some(0), Some(2), Some(3), Some(2)]),
    ("Dm", [Some(0), Some(0), Some(0), Some(2), Some(3), Some(2)]),
    ("E", [Some(0), Some(2), Some(2), Some(1), Some(0), Some(0)]),
    ("Em", [Some(0), Some(2), Some(2), Some(0), Some(0), Some(0)]),
    ("F", [Some(1), Some(3), Some(3), Some(2), Some(1), Some(1)]),
    ("Fm", [Some(0), Some(0), Some(3), Some(1), Some(1), Some(1)]),
    ("G", [Some(3), Some(2), Some(0), Some(0), Some(0), Some(3)]),
    ("Gm", [Some(0), Some(0), Some(5), Some(3), Some(3), Some(3)]),
    ("A", [Some(0), Some(0), Some(2), Some(2), Some(2), Some(0)]),
    ("Am", [Some(0), Some(0), Some(2), Some(2), Some(1), Some(0)]),
    ("A7", [Some(0), Some(0), Some(2), Some(0), Some(2), Some(0)]),
    ("Am7", [Some(0), Some(0), Some(2), Some(0), Some(1), Some(0)]),
    ("B", [Some(0), Some(0), Some(4), Some(4), Some(4), Some(2)]),
];

/// Look up a chord's fret positions by name (case-sensitive: `Am` vs `AM`)
pub fn chord(name: &str) -> Result<Frets> {
    CHORDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, frets)| *frets)
        .ok_or_else(|| Error::UnknownChord(name.to_string()))
}

/// Names of all known chords
pub fn chord_names() -> impl Iterator<Item = &'static str> {
    CHORDS.iter().map(|(name, _)| *name)
}

/// Standard tuning: E2 A2 D3 G3 B3 E4
pub fn standard_tuning() -> Tuning {
    [
        (2, PitchClass::E),
        (2, PitchClass::A),
        (3, PitchClass::D),
        (3, PitchClass::G),
        (3, PitchClass::B),
        (4, PitchClass::E),
    ]
    .map(|(octave, pitch_class)| Pitch { octave, pitch_class }.frequency())
}

/// Frequency of a fretted string: each fret is one equal-tempered semitone
pub fn fretted_frequency(open: f32, fret: u8) -> f32 {
    2f32.powf(fret as f32 / 12.0) * open
}

/// Direction of a strum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Low string to high string
    Down,
    /// High string to low string; unplayed strings are damped
    Up,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "down" | "d" => Ok(Direction::Down),
            "up" | "u" => Ok(Direction::Up),
            _ => Err(format!("invalid strum direction: {}", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Down => f.write_str("down"),
            Direction::Up => f.write_str("up"),
        }
    }
}

/// Configuration for the strummer
#[derive(Debug, Clone, PartialEq)]
pub struct StrumConfig {
    /// Open-string frequencies, low E first
    pub tuning: Tuning,
    /// Frames between consecutive strings
    pub delay: Frame,
}

impl Default for StrumConfig {
    fn default() -> Self {
        Self {
            tuning: standard_tuning(),
            delay: 200, // ≈4.5ms at 44.1kHz
        }
    }
}

/// Default string sound: a plucked string
pub fn plucked(sample_rate: u32, decay_secs: f32) -> impl Fn(f32) -> SharedNote {
    move |frequency: f32| -> SharedNote {
        std::sync::Arc::new(Pluck::new(frequency, sample_rate, decay_secs))
    }
}

/// Schedules strums on a six-string keyed player
///
/// `sample` builds the sound of one string from its frequency. Notes are
/// built when the strum is requested; only their start (or a damping mute)
/// is deferred.
///
/// # Example
/// ```
/// use plectrum::player::strummer::{plucked, GuitarStrummer};
///
/// let mut guitar = GuitarStrummer::new(plucked(44100, 0.5));
/// guitar.strum_down("G", 200).unwrap();
/// assert_eq!(guitar.keyed().scheduler().queued_count(), 6);
/// assert!(guitar.strum_down("H", 200).is_err());
/// ```
pub struct GuitarStrummer<S> {
    keyed: KeyedPlayer<usize>,
    sample: S,
    config: StrumConfig,
}

impl<S> GuitarStrummer<S>
where
    S: Fn(f32) -> SharedNote,
{
    pub fn new(sample: S) -> Self {
        Self::with_config(sample, StrumConfig::default())
    }

    pub fn with_config(sample: S, config: StrumConfig) -> Self {
        Self {
            keyed: KeyedPlayer::new(),
            sample,
            config,
        }
    }

    /// Per-string frequencies of `chord`; `None` for unplayed strings
    pub fn frequencies(&self, chord_name: &str) -> Result<[Option<f32>; STRINGS]> {
        let frets = chord(chord_name)?;
        let mut out = [None; STRINGS];
        for (i, fret) in frets.iter().enumerate() {
            out[i] = fret.map(|f| fretted_frequency(self.config.tuning[i], f));
        }
        Ok(out)
    }

    /// Strike strings low to high, `delay` frames apart
    ///
    /// String `i` starts `i * delay` frames after the most recent query.
    /// Unplayed strings are left alone.
    pub fn strum_down(&mut self, chord_name: &str, delay: Frame) -> Result<()> {
        let freqs = self.frequencies(chord_name)?;
        debug!(chord = chord_name, delay, "strum down");

        for (string, freq) in freqs.iter().enumerate() {
            if let Some(freq) = freq {
                let note = (self.sample)(*freq);
                self.keyed
                    .queue(string as Frame * delay, Callback::Play((string, note)));
            }
        }
        Ok(())
    }

    /// Strike strings high to low, `delay` frames apart
    ///
    /// String `i` is reached `(5 - i) * delay` frames after the most recent
    /// query. Unplayed strings are damped at that moment instead of skipped.
    pub fn strum_up(&mut self, chord_name: &str, delay: Frame) -> Result<()> {
        let freqs = self.frequencies(chord_name)?;
        debug!(chord = chord_name, delay, "strum up");

        for (string, freq) in freqs.iter().enumerate() {
            let offset = (STRINGS - 1 - string) as Frame * delay;
            match freq {
                Some(freq) => {
                    let note = (self.sample)(*freq);
                    self.keyed.queue(offset, Callback::Play((string, note)));
                }
                None => self
                    .keyed
                    .queue(offset, Callback::InvokeWith(mute_key, string)),
            }
        }
        Ok(())
    }

    pub fn strum(&mut self, chord_name: &str, direction: Direction, delay: Frame) -> Result<()> {
        match direction {
            Direction::Down => self.strum_down(chord_name, delay),
            Direction::Up => self.strum_up(chord_name, delay),
        }
    }

    /// Strum with the configured delay
    pub fn strum_default(&mut self, chord_name: &str, direction: Direction) -> Result<()> {
        self.strum(chord_name, direction, self.config.delay)
    }

    /// Damp one string now
    pub fn mute(&mut self, string: usize) {
        self.keyed.mute(&string);
    }

    /// Damp every string now
    pub fn mute_all(&mut self) {
        for string in 0..STRINGS {
            self.keyed.mute(&string);
        }
    }

    pub fn amplitude(&mut self, frame: Frame) -> f32 {
        self.keyed.amplitude(frame)
    }

    pub fn frame(&self) -> Frame {
        self.keyed.frame()
    }

    pub fn config(&self) -> &StrumConfig {
        &self.config
    }

    pub fn keyed(&self) -> &KeyedPlayer<usize> {
        &self.keyed
    }

    pub fn keyed_mut(&mut self) -> &mut KeyedPlayer<usize> {
        &mut self.keyed
    }
}

impl<S> Source for GuitarStrummer<S>
where
    S: Fn(f32) -> SharedNote,
{
    fn duration(&self) -> Duration {
        Duration::Infinite
    }

    fn sample(&mut self, frame: Frame) -> f32 {
        self.amplitude(frame)
    }
}
