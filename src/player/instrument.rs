//! Instrument binding
//!
//! Binds a keyed player to a factory that builds the note from the key and
//! some construction arguments. `play(key, args)` builds, then plays keyed.

use std::hash::Hash;

use super::keyed::KeyedPlayer;
use super::scheduler::Callback;
use crate::pitch::Pitch;
use crate::signal::{Duration, Frame, Pluck, SharedNote, Source};

/// Builds a note for a key
pub trait Instrument<K> {
    /// Construction arguments beyond the key
    type Args;

    fn build(&self, key: &K, args: Self::Args) -> SharedNote;
}

/// Keyed player that builds its own notes
///
/// Callbacks queued here run against the underlying [`KeyedPlayer`].
pub struct InstrumentPlayer<K: Eq + Hash + Send, I> {
    keyed: KeyedPlayer<K>,
    instrument: I,
}

impl<K, I> InstrumentPlayer<K, I>
where
    K: Eq + Hash + Send,
    I: Instrument<K>,
{
    pub fn new(instrument: I) -> Self {
        Self {
            keyed: KeyedPlayer::new(),
            instrument,
        }
    }

    /// Build a note for `key` and play it, retiring the key's previous note
    pub fn play(&mut self, key: K, args: I::Args) {
        let note = self.instrument.build(&key, args);
        self.keyed.play(key, note);
    }

    pub fn mute(&mut self, key: &K) {
        self.keyed.mute(key);
    }

    pub fn queue(&mut self, offset: Frame, callback: Callback<KeyedPlayer<K>>) {
        self.keyed.queue(offset, callback);
    }

    pub fn queue_at(&mut self, due: Frame, callback: Callback<KeyedPlayer<K>>) {
        self.keyed.queue_at(due, callback);
    }

    pub fn amplitude(&mut self, frame: Frame) -> f32 {
        self.keyed.amplitude(frame)
    }

    pub fn keyed(&self) -> &KeyedPlayer<K> {
        &self.keyed
    }

    pub fn keyed_mut(&mut self) -> &mut KeyedPlayer<K> {
        &mut self.keyed
    }

    pub fn instrument(&self) -> &I {
        &self.instrument
    }
}

impl<K, I> Source for InstrumentPlayer<K, I>
where
    K: Eq + Hash + Send,
    I: Instrument<K>,
{
    fn duration(&self) -> Duration {
        Duration::Infinite
    }

    fn sample(&mut self, frame: Frame) -> f32 {
        self.amplitude(frame)
    }
}

/// Plucked-string instrument keyed by pitch; the argument is the gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluckInstrument {
    pub sample_rate: u32,
    /// Time for the fundamental to fall to 1/e, in seconds
    pub decay_secs: f32,
}

impl Default for PluckInstrument {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            decay_secs: 0.8,
        }
    }
}

impl Instrument<Pitch> for PluckInstrument {
    type Args = f32;

    fn build(&self, key: &Pitch, gain: f32) -> SharedNote {
        std::sync::Arc::new(
            Pluck::new(key.frequency(), self.sample_rate, self.decay_secs).with_gain(gain),
        )
    }
}
