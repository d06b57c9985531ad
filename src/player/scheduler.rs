//! Scheduler and frame driver
//!
//! Keeps the active notes and deferred callbacks ordered by time, and mixes
//! the active notes once per frame. Every player layer owns exactly one
//! [`Scheduler`] and is driven through [`drive`], which is the only frame
//! loop in the crate.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::signal::{same_note, Duration, Frame, SharedNote, Source};

/// Anything that owns a scheduler and can receive its callbacks
///
/// Callbacks fire with mutable access to the host, so they can play, mute
/// and queue through whatever layer the host adds (keys, instruments, ...).
pub trait Host: Sized {
    /// Argument carried by [`Callback::InvokeWith`]
    type Arg: Send;
    /// Payload carried by [`Callback::Play`]
    type Play: Send;

    /// The scheduler this host owns
    fn scheduler_mut(&mut self) -> &mut Scheduler<Self>;

    /// Start the note described by a [`Callback::Play`] payload
    fn play_scheduled(&mut self, play: Self::Play);
}

/// A deferred action
pub enum Callback<H: Host> {
    /// Run a closure against the host
    Invoke(Box<dyn FnOnce(&mut H) + Send>),
    /// Call a function with an argument captured at queue time
    InvokeWith(fn(&mut H, H::Arg), H::Arg),
    /// Play a note through the host
    Play(H::Play),
}

impl<H: Host> Callback<H> {
    /// Wrap a closure
    pub fn invoke(action: impl FnOnce(&mut H) + Send + 'static) -> Self {
        Callback::Invoke(Box::new(action))
    }

    fn fire(self, host: &mut H) {
        match self {
            Callback::Invoke(action) => action(host),
            Callback::InvokeWith(action, arg) => action(host, arg),
            Callback::Play(play) => host.play_scheduled(play),
        }
    }
}

impl<H: Host> fmt::Debug for Callback<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Invoke(_) => f.write_str("Invoke"),
            Callback::InvokeWith(..) => f.write_str("InvokeWith"),
            Callback::Play(_) => f.write_str("Play"),
        }
    }
}

/// Heap ordering key: (time, insertion sequence)
///
/// The sequence number breaks ties so that entries sharing a frame come out
/// in the order they went in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    at: Frame,
    seq: u64,
}

/// A callback waiting for its due frame
struct Pending<H: Host> {
    key: Key,
    callback: Callback<H>,
}

impl<H: Host> PartialEq for Pending<H> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<H: Host> Eq for Pending<H> {}

impl<H: Host> PartialOrd for Pending<H> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior.
impl<H: Host> Ord for Pending<H> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).reverse()
    }
}

/// A finite note that is currently sounding
struct Playing {
    key: Key,
    start: Frame,
    note: SharedNote,
}

impl PartialEq for Playing {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Playing {}

impl PartialOrd for Playing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Playing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).reverse()
    }
}

/// Time-ordered note and callback storage for one player
///
/// - Finite notes live in a min-heap on their end frame and are dropped as
///   soon as the clock reaches it.
/// - Infinite notes live in a plain list until muted.
/// - Callbacks live in a min-heap on their due frame.
/// - Plays requested since the last query wait in a pending list and are
///   started at the top of the next query.
pub struct Scheduler<H: Host> {
    /// Frame of the most recent query
    frame: Frame,
    /// Insertion counter shared by notes and callbacks
    seq: u64,
    pending: Vec<SharedNote>,
    finite: BinaryHeap<Playing>,
    infinite: Vec<(Frame, SharedNote)>,
    callbacks: BinaryHeap<Pending<H>>,
}

impl<H: Host> Default for Scheduler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Scheduler<H> {
    pub fn new() -> Self {
        Self {
            frame: 0,
            seq: 0,
            pending: Vec::new(),
            finite: BinaryHeap::new(),
            infinite: Vec::new(),
            callbacks: BinaryHeap::new(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Frame of the most recent query
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Request a note; it starts at the next query
    pub fn play(&mut self, note: SharedNote) {
        self.pending.push(note);
    }

    /// Stop `note` if it is sounding
    ///
    /// Identity comparison. A note that is not sounding is ignored; in
    /// particular a note played since the last query still starts.
    pub fn mute(&mut self, note: &SharedNote) {
        self.finite.retain(|p| !same_note(&p.note, note));
        self.infinite.retain(|(_, n)| !same_note(n, note));
    }

    /// Drop `note` from the plays waiting for the next query
    pub(crate) fn cancel_pending(&mut self, note: &SharedNote) {
        self.pending.retain(|n| !same_note(n, note));
    }

    /// Queue a callback `offset` frames after the most recent query
    pub fn queue(&mut self, offset: Frame, callback: Callback<H>) {
        self.queue_at(self.frame.saturating_add(offset), callback);
    }

    /// Queue a callback at absolute frame `due`
    pub fn queue_at(&mut self, due: Frame, callback: Callback<H>) {
        let key = Key {
            at: due,
            seq: self.next_seq(),
        };
        self.callbacks.push(Pending { key, callback });
    }

    /// Start pending notes and move the clock to `frame`
    ///
    /// Pending notes are stamped with the clock as it was before the move.
    fn advance(&mut self, frame: Frame) {
        let start = self.frame;
        let pending = std::mem::take(&mut self.pending);
        for note in pending {
            match note.duration() {
                Duration::Infinite => self.infinite.push((start, note)),
                Duration::Frames(length) => {
                    let key = Key {
                        at: start.saturating_add(length),
                        seq: self.next_seq(),
                    };
                    self.finite.push(Playing { key, start, note });
                }
            }
        }
        self.frame = frame;
    }

    /// Pop the earliest callback if it is due
    fn pop_due(&mut self) -> Option<Callback<H>> {
        if self.callbacks.peek()?.key.at > self.frame {
            return None;
        }
        self.callbacks.pop().map(|p| p.callback)
    }

    /// Drop finished notes and sum the rest at the current frame
    fn mix(&mut self) -> f32 {
        let frame = self.frame;
        while self.finite.peek().map_or(false, |p| p.key.at <= frame) {
            self.finite.pop();
        }

        let finite: f32 = self
            .finite
            .iter()
            .map(|p| p.note.amplitude(frame.saturating_sub(p.start)))
            .sum();
        let infinite: f32 = self
            .infinite
            .iter()
            .map(|(start, note)| note.amplitude(frame.saturating_sub(*start)))
            .sum();
        finite + infinite
    }

    /// Whether `note` is currently sounding (finite or infinite)
    pub fn is_active(&self, note: &SharedNote) -> bool {
        self.finite.iter().any(|p| same_note(&p.note, note))
            || self.infinite.iter().any(|(_, n)| same_note(n, note))
    }

    /// Whether `note` has been played but not started yet
    pub fn is_pending(&self, note: &SharedNote) -> bool {
        self.pending.iter().any(|n| same_note(n, note))
    }

    /// Number of sounding notes
    pub fn active_count(&self) -> usize {
        self.finite.len() + self.infinite.len()
    }

    pub fn finite_count(&self) -> usize {
        self.finite.len()
    }

    pub fn infinite_count(&self) -> usize {
        self.infinite.len()
    }

    /// Notes requested but not yet started
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Callbacks not yet fired
    pub fn queued_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Queued callbacks with their due frames, earliest first
    pub fn queued(&self) -> Vec<(Frame, &Callback<H>)> {
        let mut entries: Vec<&Pending<H>> = self.callbacks.iter().collect();
        entries.sort_by_key(|p| p.key);
        entries.into_iter().map(|p| (p.key.at, &p.callback)).collect()
    }

    /// Drop all notes and callbacks; the clock is kept
    pub fn clear(&mut self) {
        self.pending.clear();
        self.finite.clear();
        self.infinite.clear();
        self.callbacks.clear();
    }
}

/// Compute the mixed amplitude of `host` at `frame`
///
/// In order:
/// 1. Start notes played since the previous query
/// 2. Move the clock to `frame`
/// 3. Fire every callback due at or before `frame`, earliest first
/// 4. Drop finite notes whose end frame has been reached
/// 5. Sum the remaining notes
///
/// Callbacks may play, mute and queue freely. A callback queued for a frame
/// that is already due fires in the same pass.
pub fn drive<H: Host>(host: &mut H, frame: Frame) -> f32 {
    host.scheduler_mut().advance(frame);
    while let Some(callback) = host.scheduler_mut().pop_due() {
        callback.fire(host);
    }
    host.scheduler_mut().mix()
}

/// Plain player: notes addressed by identity
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use plectrum::player::AsyncPlayer;
/// use plectrum::signal::{Ramp, SharedNote};
///
/// let mut player = AsyncPlayer::new();
/// let note: SharedNote = Arc::new(Ramp::new(100));
/// player.play(note.clone());
///
/// assert_eq!(player.amplitude(0), 0.0);
/// assert!(player.amplitude(1) > 0.0);
/// player.mute(&note);
/// assert_eq!(player.amplitude(2), 0.0);
/// ```
#[derive(Default)]
pub struct AsyncPlayer {
    scheduler: Scheduler<AsyncPlayer>,
}

impl AsyncPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, note: SharedNote) {
        self.scheduler.play(note);
    }

    pub fn mute(&mut self, note: &SharedNote) {
        self.scheduler.mute(note);
    }

    pub fn queue(&mut self, offset: Frame, callback: Callback<Self>) {
        self.scheduler.queue(offset, callback);
    }

    pub fn queue_at(&mut self, due: Frame, callback: Callback<Self>) {
        self.scheduler.queue_at(due, callback);
    }

    /// Mixed output at `frame`; see [`drive`]
    pub fn amplitude(&mut self, frame: Frame) -> f32 {
        drive(self, frame)
    }

    pub fn frame(&self) -> Frame {
        self.scheduler.frame()
    }

    pub fn scheduler(&self) -> &Scheduler<Self> {
        &self.scheduler
    }
}

impl Host for AsyncPlayer {
    type Arg = SharedNote;
    type Play = SharedNote;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Self> {
        &mut self.scheduler
    }

    fn play_scheduled(&mut self, note: SharedNote) {
        self.play(note);
    }
}

impl Source for AsyncPlayer {
    fn duration(&self) -> Duration {
        Duration::Infinite
    }

    fn sample(&mut self, frame: Frame) -> f32 {
        self.amplitude(frame)
    }
}
