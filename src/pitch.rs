//! Note names and equal-tempered frequencies
//!
//! Format: <letter><accidental><octave>
//!
//! - Letters: c, d, e, f, g, a, b (either case)
//! - Accidentals: `#` (sharp) or `b` (flat), optional
//! - Octaves: 0-9, scientific pitch notation (A4 = 440 Hz)
//!
//! Examples: `E2`, `c#4`, `Bb3`

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Frequency of A4 in Hz
pub const A4_FREQUENCY: f32 = 440.0;

/// Pitch classes (sharps only; flats are folded onto the sharp below)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Convert pitch class to semitone number (C=0, C#=1, D=2, ...)
    pub fn semitone(&self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::CSharp => 1,
            PitchClass::D => 2,
            PitchClass::DSharp => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::FSharp => 6,
            PitchClass::G => 7,
            PitchClass::GSharp => 8,
            PitchClass::A => 9,
            PitchClass::ASharp => 10,
            PitchClass::B => 11,
        }
    }

    fn from_semitone(semitone: u8) -> Self {
        Self::ALL[(semitone % 12) as usize]
    }

    fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

/// A pitch: pitch class plus octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub octave: u8,
    pub pitch_class: PitchClass,
}

impl Pitch {
    /// MIDI note number (C4 = 60, A4 = 69)
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class.semitone() as i32
    }

    /// Equal-tempered frequency in Hz
    ///
    /// Formula: f = 440 * 2^((midi - 69) / 12)
    pub fn frequency(&self) -> f32 {
        A4_FREQUENCY * 2f32.powf((self.midi() - 69) as f32 / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.name(), self.octave)
    }
}

impl FromStr for Pitch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNoteName(s.to_string());
        let s = s.trim();

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: u8 = match letter.to_ascii_lowercase() {
            'c' => 0,
            'd' => 2,
            'e' => 4,
            'f' => 5,
            'g' => 7,
            'a' => 9,
            'b' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (shift, octave_str): (i8, &str) = if let Some(o) = rest.strip_prefix('#') {
            (1, o)
        } else if let Some(o) = rest.strip_prefix('b') {
            (-1, o)
        } else {
            (0, rest)
        };

        let octave: u8 = octave_str.parse().map_err(|_| invalid())?;
        if octave > 9 {
            return Err(invalid());
        }

        // Cb and B# cross the octave boundary
        let midi = (octave as i32 + 1) * 12 + natural as i32 + shift as i32;
        if midi < 12 {
            return Err(invalid());
        }
        Ok(Pitch {
            octave: (midi / 12 - 1) as u8,
            pitch_class: PitchClass::from_semitone((midi % 12) as u8),
        })
    }
}

/// Frequency in Hz of a note name such as `E2` or `c#4`
pub fn frequency(name: &str) -> Result<f32, Error> {
    Ok(name.parse::<Pitch>()?.frequency())
}
