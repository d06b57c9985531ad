use super::{Duration, Frame, Note};

/// Linear fade-in from 0.0 to 1.0
///
/// The first frame is 0.0 and the last is 1.0. Offsets past the end hold
/// 1.0, though the scheduler retires the note before it asks for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    /// Total duration in frames
    duration: Frame,
}

impl Ramp {
    /// Create a new ramp
    ///
    /// # Arguments
    /// * `duration` - Duration of the ramp in frames
    ///
    /// # Example
    /// ```
    /// use plectrum::signal::{Note, Ramp};
    ///
    /// let ramp = Ramp::new(44100); // 1 second ramp at 44.1kHz
    /// assert_eq!(ramp.amplitude(0), 0.0);
    /// ```
    pub fn new(duration: Frame) -> Self {
        Self {
            duration: duration.max(1), // Ensure at least 1 frame
        }
    }
}

impl Note for Ramp {
    fn duration(&self) -> Duration {
        Duration::Frames(self.duration)
    }

    fn amplitude(&self, frame: Frame) -> f32 {
        if frame >= self.duration {
            return 1.0;
        }
        frame as f32 / (self.duration - 1).max(1) as f32
    }
}
