//! Error types for every layer of the sequencer.

use thiserror::Error;

/// Why a note name was rejected by the pitch resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteNameError {
    /// The name is not 2-4 characters long.
    #[error("'{0}' is not a valid note name: expected 2 to 4 characters")]
    InvalidLength(String),

    /// The first character is not one of A-G.
    #[error("'{0}' is not a valid note name: pitch class must be A-G")]
    InvalidPitchClass(String),

    /// A sharp was placed after E or B.
    #[error("'{0}' is not a valid note name: E and B cannot be sharpened")]
    InvalidAccidental(String),

    /// The octave digit is outside the range of the notation style.
    #[error("'{0}' is not a valid note name: octave out of range")]
    InvalidOctave(String),

    /// The name does not match any accepted shape.
    #[error("'{0}' is not a valid note name: unrecognised format")]
    InvalidFormat(String),
}

impl NoteNameError {
    /// The rejected note name.
    pub fn name(&self) -> &str {
        match self {
            NoteNameError::InvalidLength(name)
            | NoteNameError::InvalidPitchClass(name)
            | NoteNameError::InvalidAccidental(name)
            | NoteNameError::InvalidOctave(name)
            | NoteNameError::InvalidFormat(name) => name,
        }
    }
}

/// Precondition failures when building a [`crate::Sequencer`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequencerError {
    #[error("sequencer needs at least one track")]
    NoTracks,

    #[error("invalid timing: {0}")]
    InvalidTiming(String),
}

/// Errors raised while loading or validating a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Errors raised while parsing a score file.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("reading score file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Note {
        line: usize,
        #[source]
        source: NoteNameError,
    },

    #[error("score has no tracks (need '[track: name]' followed by note lines)")]
    Empty,
}

/// Errors raised while writing a WAV file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing WAV file: {0}")]
    Wav(#[from] hound::Error),
}

/// Errors raised by the audio device layer.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output audio device available")]
    NoDevice,

    #[error("failed to get default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to play stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio thread disconnected")]
    Disconnected,
}

/// A textual setting (style, waveform, phase policy) that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
