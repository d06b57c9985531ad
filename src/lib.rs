//! Frame-driven audio event scheduler
//!
//! - `signal`: notes (anything with a duration and an amplitude per frame)
//! - `player`: the scheduler and the keyed, instrument and strum layers on top
//! - `render` / `wav`: pulling a player or note into buffers and WAV files

pub mod error;
pub mod pitch;
pub mod player;
pub mod render;
pub mod signal;
pub mod wav;

pub use error::{Error, Result};
