//! Keyed player
//!
//! Addresses notes by a key ("whatever is playing on string 3") instead of
//! by identity. Playing under an occupied key retires the previous note
//! first, so a key never owns two notes at once.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use super::scheduler::{drive, Callback, Host, Scheduler};
use crate::signal::{Duration, Frame, SharedNote, Source};

/// Player whose notes are addressed by key
pub struct KeyedPlayer<K: Eq + Hash + Send> {
    scheduler: Scheduler<KeyedPlayer<K>>,
    active: HashMap<K, SharedNote>,
}

impl<K: Eq + Hash + Send> Default for KeyedPlayer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Send> KeyedPlayer<K> {
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            active: HashMap::new(),
        }
    }

    /// Play `note` under `key`, muting whatever the key held before
    pub fn play(&mut self, key: K, note: SharedNote) {
        self.mute(&key);
        self.scheduler.play(note.clone());
        self.active.insert(key, note);
    }

    /// Mute the note held by `key`; unknown keys are ignored
    ///
    /// A note played under the key since the last query never starts.
    pub fn mute(&mut self, key: &K) {
        if let Some(note) = self.active.remove(key) {
            trace!("retiring keyed note");
            self.scheduler.cancel_pending(&note);
            self.scheduler.mute(&note);
        }
    }

    pub fn queue(&mut self, offset: Frame, callback: Callback<Self>) {
        self.scheduler.queue(offset, callback);
    }

    pub fn queue_at(&mut self, due: Frame, callback: Callback<Self>) {
        self.scheduler.queue_at(due, callback);
    }

    /// Mixed output at `frame`
    pub fn amplitude(&mut self, frame: Frame) -> f32 {
        drive(self, frame)
    }

    /// Note most recently played under `key`
    ///
    /// A note that ended on its own stays mapped until the key is played
    /// again or muted; see [`is_sounding`](Self::is_sounding).
    pub fn active_note(&self, key: &K) -> Option<&SharedNote> {
        self.active.get(key)
    }

    /// Whether the note under `key` is still sounding (or about to start)
    pub fn is_sounding(&self, key: &K) -> bool {
        self.active.get(key).map_or(false, |note| {
            self.scheduler.is_active(note) || self.scheduler.is_pending(note)
        })
    }

    /// Keys currently mapped to a note
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.active.keys()
    }

    pub fn frame(&self) -> Frame {
        self.scheduler.frame()
    }

    pub fn scheduler(&self) -> &Scheduler<Self> {
        &self.scheduler
    }
}

impl<K: Eq + Hash + Send> Host for KeyedPlayer<K> {
    type Arg = K;
    type Play = (K, SharedNote);

    fn scheduler_mut(&mut self) -> &mut Scheduler<Self> {
        &mut self.scheduler
    }

    fn play_scheduled(&mut self, (key, note): (K, SharedNote)) {
        self.play(key, note);
    }
}

impl<K: Eq + Hash + Send> Source for KeyedPlayer<K> {
    fn duration(&self) -> Duration {
        Duration::Infinite
    }

    fn sample(&mut self, frame: Frame) -> f32 {
        self.amplitude(frame)
    }
}

/// Mute by key; usable as a [`Callback::InvokeWith`] target
pub fn mute_key<K: Eq + Hash + Send>(player: &mut KeyedPlayer<K>, key: K) {
    player.mute(&key);
}
