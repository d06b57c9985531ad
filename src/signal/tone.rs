//! Periodic notes: a plain sine tone and a decaying plucked string.

use std::f32::consts::PI;

use super::{Duration, Frame, Note};

/// Sine tone at a fixed frequency
///
/// Finite or infinite. Amplitude is `gain * sin(2π f n / sample_rate)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Phase increment per frame in radians
    phase_per_frame: f32,
    gain: f32,
    duration: Duration,
}

impl Tone {
    /// Create a new sine tone
    ///
    /// # Arguments
    /// * `frequency` - Frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `duration` - Length of the tone
    pub fn new(frequency: f32, sample_rate: u32, duration: Duration) -> Self {
        Self {
            phase_per_frame: 2.0 * PI * frequency / sample_rate as f32,
            gain: 1.0,
            duration,
        }
    }

    /// Scale the output by `gain`
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }
}

impl Note for Tone {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn amplitude(&self, frame: Frame) -> f32 {
        // Wrap in f64 so long tones keep their phase precision
        let phase = (self.phase_per_frame as f64 * frame as f64) % (2.0 * std::f64::consts::PI);
        self.gain * (phase as f32).sin()
    }
}

/// Relative strengths of the first partials of a plucked string
const PLUCK_PARTIALS: [f32; 4] = [1.0, 0.5, 0.25, 0.125];

/// Level (relative to the attack) at which a pluck is considered silent
const PLUCK_FLOOR: f32 = 1e-3;

/// Plucked string
///
/// A handful of harmonics under an exponential decay. Higher partials decay
/// faster, which is what makes it sound like a string rather than a bell.
/// The note ends once the fundamental has decayed below -60 dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pluck {
    phase_per_frame: f32,
    /// Decay rate of the fundamental per frame
    decay_per_frame: f32,
    gain: f32,
    length: Frame,
}

impl Pluck {
    /// Create a new plucked string
    ///
    /// # Arguments
    /// * `frequency` - Fundamental frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `decay_secs` - Time for the fundamental to fall to 1/e
    ///
    /// # Example
    /// ```
    /// use plectrum::signal::{Duration, Note, Pluck};
    ///
    /// let pluck = Pluck::new(110.0, 44100, 0.5);
    /// assert!(matches!(pluck.duration(), Duration::Frames(_)));
    /// ```
    pub fn new(frequency: f32, sample_rate: u32, decay_secs: f32) -> Self {
        let decay_frames = (decay_secs * sample_rate as f32).max(1.0);
        let length = (-PLUCK_FLOOR.ln() * decay_frames).ceil() as Frame;
        Self {
            phase_per_frame: 2.0 * PI * frequency / sample_rate as f32,
            decay_per_frame: 1.0 / decay_frames,
            gain: 0.3,
            length,
        }
    }

    /// Scale the output by `gain`
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }
}

impl Note for Pluck {
    fn duration(&self) -> Duration {
        Duration::Frames(self.length)
    }

    fn amplitude(&self, frame: Frame) -> f32 {
        if frame >= self.length {
            return 0.0;
        }
        let n = frame as f32;
        let mut out = 0.0f32;
        for (i, &strength) in PLUCK_PARTIALS.iter().enumerate() {
            let harmonic = (i + 1) as f32;
            let phase = (self.phase_per_frame as f64 * harmonic as f64 * frame as f64)
                % (2.0 * std::f64::consts::PI);
            let envelope = (-n * self.decay_per_frame * harmonic).exp();
            out += strength * envelope * (phase as f32).sin();
        }
        self.gain * out
    }
}

/// Zero output for a fixed number of frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Silence {
    length: Frame,
}

impl Silence {
    pub fn new(length: Frame) -> Self {
        Self { length }
    }
}

impl Note for Silence {
    fn duration(&self) -> Duration {
        Duration::Frames(self.length)
    }

    fn amplitude(&self, _frame: Frame) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_starts_at_zero() {
        let tone = Tone::new(440.0, 44100, Duration::Infinite);
        assert_eq!(tone.amplitude(0), 0.0);
        assert_eq!(tone.duration(), Duration::Infinite);
    }

    #[test]
    fn test_tone_period() {
        // 100 Hz at 1000 Hz sample rate repeats every 10 frames
        let tone = Tone::new(100.0, 1000, Duration::Frames(1000));
        for n in 0..10 {
            assert!((tone.amplitude(n) - tone.amplitude(n + 10)).abs() < 1e-4);
        }
        assert!((tone.amplitude(2) - (0.4 * PI).sin()).abs() < 1e-4);
    }

    #[test]
    fn test_tone_gain() {
        let tone = Tone::new(250.0, 1000, Duration::Frames(100)).with_gain(0.5);
        // Quarter period of 250 Hz at 1 kHz is exactly one frame
        assert!((tone.amplitude(1) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_pluck_decays() {
        let pluck = Pluck::new(110.0, 16000, 0.1);

        let energy = |range: std::ops::Range<Frame>| -> f32 {
            range.map(|n| pluck.amplitude(n).abs()).sum::<f32>()
        };

        let early = energy(0..1600);
        let late = energy(8000..9600);
        assert!(early > late * 4.0, "early={} late={}", early, late);
    }

    #[test]
    fn test_pluck_length() {
        let pluck = Pluck::new(110.0, 1000, 1.0);
        // 1s decay constant, -60 dB is ln(1000) ≈ 6.9 time constants
        assert_eq!(pluck.duration(), Duration::Frames(6908));
        assert_eq!(pluck.amplitude(6908), 0.0);
    }

    #[test]
    fn test_pluck_bounded() {
        let pluck = Pluck::new(330.0, 44100, 0.5).with_gain(1.0);
        let total: f32 = PLUCK_PARTIALS.iter().sum();
        for n in 0..44100 {
            assert!(pluck.amplitude(n).abs() <= total + 1e-4);
        }
    }

    #[test]
    fn test_silence() {
        let silence = Silence::new(3);
        assert_eq!(silence.duration(), Duration::Frames(3));
        assert_eq!(silence.amplitude(1), 0.0);
    }
}
