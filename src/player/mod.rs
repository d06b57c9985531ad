//! Players
//!
//! Layered event players, each built on the one below:
//! - Scheduler: time-ordered notes and callbacks, plus the frame driver
//! - KeyedPlayer: notes addressed by key, one note per key
//! - InstrumentPlayer: keyed player that builds its notes from the key
//! - GuitarStrummer: chord strums as timed keyed events

pub mod instrument;
pub mod keyed;
pub mod scheduler;
pub mod strummer;

pub use instrument::{Instrument, InstrumentPlayer, PluckInstrument};
pub use keyed::{mute_key, KeyedPlayer};
pub use scheduler::{drive, AsyncPlayer, Callback, Host, Scheduler};
pub use strummer::{chord, plucked, Direction, GuitarStrummer, StrumConfig};
