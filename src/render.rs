//! Rendering
//!
//! Pulls a [`Source`] frame by frame, either all at once into a buffer or
//! one device buffer at a time through [`StreamFiller`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::signal::{Duration, Frame, Source};

/// Render configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of samples per device buffer
    pub frame_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            frame_size: 64,
        }
    }
}

impl RenderConfig {
    /// Number of frames in `secs` seconds
    pub fn frames(&self, secs: f32) -> Frame {
        (secs.max(0.0) * self.sample_rate as f32).round() as Frame
    }
}

/// Render `source` from frame 0
///
/// Renders `length` frames if given, otherwise the source's own duration.
/// Samples are clamped to [-1, 1].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use plectrum::render::render;
/// use plectrum::signal::{Ramp, SharedNote};
///
/// let mut ramp: SharedNote = Arc::new(Ramp::new(3));
/// assert_eq!(render(&mut ramp, None).unwrap(), vec![0.0, 0.5, 1.0]);
/// ```
pub fn render<S: Source + ?Sized>(source: &mut S, length: Option<Frame>) -> Result<Vec<f32>> {
    let length = match (length, source.duration()) {
        (Some(length), _) => length,
        (None, Duration::Frames(length)) => length,
        (None, Duration::Infinite) => return Err(Error::InfiniteDuration),
    };
    debug!(length, "rendering");

    Ok((0..length)
        .map(|frame| source.sample(frame).clamp(-1.0, 1.0))
        .collect())
}

/// Whether a stream should keep running after a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Source still has frames to produce
    Continue,
    /// Source has reached its end; the last buffer is zero-padded
    Stop,
}

/// Fills device buffers from a source
///
/// Holds the absolute frame counter so successive callbacks pick up where
/// the previous one stopped.
pub struct StreamFiller<S> {
    source: S,
    frame: Frame,
}

impl<S: Source> StreamFiller<S> {
    pub fn new(source: S) -> Self {
        Self { source, frame: 0 }
    }

    /// Fill `buffer` with the next samples
    ///
    /// Past the end of a finite source the remaining slots are zeroed and
    /// [`StreamState::Stop`] is returned. Infinite sources never stop.
    pub fn fill(&mut self, buffer: &mut [f32]) -> StreamState {
        let end = self.source.duration().frames();
        for slot in buffer.iter_mut() {
            *slot = match end {
                Some(end) if self.frame >= end => 0.0,
                _ => {
                    let sample = self.source.sample(self.frame).clamp(-1.0, 1.0);
                    self.frame += 1;
                    sample
                }
            };
        }

        match end {
            Some(end) if self.frame >= end => StreamState::Stop,
            _ => StreamState::Continue,
        }
    }

    /// Next frame to be rendered
    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
