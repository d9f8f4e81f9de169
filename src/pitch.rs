//! Note-name parsing and 12-TET frequency resolution.
//!
//! Accepted shapes are `C4`, `C#4`, `C-1` and `C#-1`, plus the rest marker
//! `R`. The notation style decides which octave digits are legal and where
//! octave 0 sits on the semitone scale.

use std::fmt;
use std::str::FromStr;

use crate::error::{NoteNameError, UnknownVariant};

/// Token that denotes a rest (silence).
pub const REST: &str = "R";

/// Pitch classes of the chromatic scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
    /// Offset within an octave (C=0, B=11)
    pub fn semitone(self) -> i32 {
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

    /// Natural pitch class for an upper-case letter A-G.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            _ => None,
        }
    }

    /// The sharpened class, or `None` for E and B (and for classes that are
    /// already sharp).
    pub fn sharp(self) -> Option<Self> {
        match self {
            PitchClass::C => Some(PitchClass::CSharp),
            PitchClass::D => Some(PitchClass::DSharp),
            PitchClass::F => Some(PitchClass::FSharp),
            PitchClass::G => Some(PitchClass::GSharp),
            PitchClass::A => Some(PitchClass::ASharp),
            _ => None,
        }
    }
}

/// Octave range and offset of a notation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    /// Largest magnitude reachable with the `-` (low octave) forms.
    pub min_digit: u8,
    /// Highest octave digit.
    pub max_digit: u8,
    /// Added to the octave before scaling to semitones.
    pub delta: i32,
}

impl StyleRange {
    /// Octave for a plain digit, `0..=max_digit`.
    fn octave(&self, c: char) -> Option<i32> {
        let digit = c.to_digit(10)?;
        (digit <= self.max_digit as u32).then_some(digit as i32)
    }

    /// Octave for the digit of a `-` form, `1..=min_digit`, negated.
    fn low_octave(&self, c: char) -> Option<i32> {
        let digit = c.to_digit(10)?;
        (1..=self.min_digit as u32)
            .contains(&digit)
            .then_some(-(digit as i32))
    }
}

const INTERNATIONAL: StyleRange = StyleRange {
    min_digit: 1,
    max_digit: 9,
    delta: 1,
};

const YAMAHA: StyleRange = StyleRange {
    min_digit: 2,
    max_digit: 8,
    delta: 2,
};

/// Octave numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotationStyle {
    /// Middle C is C4.
    International,
    /// Middle C is C3.
    #[default]
    Yamaha,
}

impl NotationStyle {
    pub const ALL: [NotationStyle; 2] = [NotationStyle::International, NotationStyle::Yamaha];

    pub fn range(self) -> StyleRange {
        match self {
            NotationStyle::International => INTERNATIONAL,
            NotationStyle::Yamaha => YAMAHA,
        }
    }
}

impl fmt::Display for NotationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationStyle::International => write!(f, "international"),
            NotationStyle::Yamaha => write!(f, "yamaha"),
        }
    }
}

impl FromStr for NotationStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "international" => Ok(NotationStyle::International),
            "yamaha" => Ok(NotationStyle::Yamaha),
            _ => Err(UnknownVariant {
                kind: "notation style",
                value: s.trim().to_string(),
            }),
        }
    }
}

/// Frequency in Hz of a semitone number (A4 = 69 = 440 Hz)
pub fn semitone_to_frequency(semitone: i32) -> f64 {
    440.0 * 2.0_f64.powf((semitone - 69) as f64 / 12.0)
}

/// Resolves note names to semitone numbers and frequencies for one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchResolver {
    style: NotationStyle,
}

impl PitchResolver {
    pub fn new(style: NotationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> NotationStyle {
        self.style
    }

    /// Frequency of `name` in Hz. The rest marker resolves to 0.
    pub fn resolve(&self, name: &str) -> Result<f64, NoteNameError> {
        if name == REST {
            return Ok(0.0);
        }
        self.semitone(name).map(semitone_to_frequency)
    }

    /// Semitone number of `name`. The rest marker has none and is rejected.
    pub fn semitone(&self, name: &str) -> Result<i32, NoteNameError> {
        let chars: Vec<char> = name.chars().collect();
        if !(2..=4).contains(&chars.len()) {
            return Err(NoteNameError::InvalidLength(name.to_string()));
        }

        let natural = PitchClass::from_letter(chars[0])
            .ok_or_else(|| NoteNameError::InvalidPitchClass(name.to_string()))?;
        let range = self.style.range();

        let sharpen = || {
            natural
                .sharp()
                .ok_or_else(|| NoteNameError::InvalidAccidental(name.to_string()))
        };
        let bad_octave = || NoteNameError::InvalidOctave(name.to_string());

        let (class, octave) = match chars[1..] {
            [d] => (natural, range.octave(d).ok_or_else(bad_octave)?),
            ['#', d] => {
                let class = sharpen()?;
                (class, range.octave(d).ok_or_else(bad_octave)?)
            }
            ['-', d] => (natural, range.low_octave(d).ok_or_else(bad_octave)?),
            ['#', '-', d] => {
                let class = sharpen()?;
                (class, range.low_octave(d).ok_or_else(bad_octave)?)
            }
            _ => return Err(NoteNameError::InvalidFormat(name.to_string())),
        };

        Ok(12 * (octave + range.delta) + class.semitone())
    }
}
