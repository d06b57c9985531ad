//! Notes: anything that produces a sample for a frame offset.
//!
//! The scheduler only ever asks a note two things: how long it lasts and
//! what its amplitude is at a given offset from its own start.

pub mod ramp;
pub mod tone;

use std::sync::Arc;

pub use ramp::Ramp;
pub use tone::{Pluck, Silence, Tone};

/// Sample index in the scheduler's time base
pub type Frame = u64;

/// How long a note lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    /// Finite length in frames
    Frames(Frame),
    /// Never ends on its own; only a mute removes it
    Infinite,
}

impl Duration {
    /// Finite length in frames, or `None` for infinite
    pub fn frames(&self) -> Option<Frame> {
        match self {
            Duration::Frames(n) => Some(*n),
            Duration::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Duration::Infinite)
    }
}

/// Core trait for all notes
///
/// `amplitude` must be a pure function of the offset: the scheduler may call
/// it with any offset in `0..duration`, always relative to the note's start.
pub trait Note {
    /// Length of the note
    fn duration(&self) -> Duration;

    /// Sample value at `frame` frames after the note started
    fn amplitude(&self, frame: Frame) -> f32;
}

/// A note shared between the scheduler and whoever may later mute it
pub type SharedNote = Arc<dyn Note + Send + Sync>;

/// Identity comparison for shared notes (same allocation)
pub fn same_note(a: &SharedNote, b: &SharedNote) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Something that can be pulled frame by frame by an output layer
///
/// Plain notes are sources; so is every player, which lasts forever and
/// mutates its own state as it is pulled.
pub trait Source {
    /// Length of the source
    fn duration(&self) -> Duration;

    /// Sample value at absolute `frame`
    ///
    /// Callers must supply non-decreasing frames.
    fn sample(&mut self, frame: Frame) -> f32;
}

impl Source for SharedNote {
    fn duration(&self) -> Duration {
        Note::duration(&**self)
    }

    fn sample(&mut self, frame: Frame) -> f32 {
        self.amplitude(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_frames() {
        assert_eq!(Duration::Frames(10).frames(), Some(10));
        assert_eq!(Duration::Infinite.frames(), None);
        assert!(Duration::Infinite.is_infinite());
        assert!(!Duration::Frames(0).is_infinite());
    }

    #[test]
    fn test_same_note_identity() {
        let a: SharedNote = Arc::new(Silence::new(10));
        let b: SharedNote = Arc::new(Silence::new(10));
        let a2 = Arc::clone(&a);

        assert!(same_note(&a, &a2));
        assert!(!same_note(&a, &b));
    }

    #[test]
    fn test_shared_note_as_source() {
        let mut note: SharedNote = Arc::new(Ramp::new(5));
        assert_eq!(Source::duration(&note), Duration::Frames(5));
        assert_eq!(note.sample(0), 0.0);
        assert_eq!(note.sample(4), 1.0);
    }
}
