//! Score-to-audio sequencer.
//!
//! Note names such as `C#3` are resolved to frequencies, rendered into
//! per-note waveforms, concatenated per [`Track`] and averaged into one mono
//! buffer by the [`Sequencer`].
//!
//! ```
//! use simpleseq::{Note, PitchResolver, NotationStyle, Sequencer, Track, Waveform};
//!
//! let resolver = PitchResolver::new(NotationStyle::Yamaha);
//! let mut track = Track::new(Waveform::Sine);
//! track.append(Note::new("C3", 480, &resolver)?);
//! track.append(Note::new("R", 240, &resolver)?);
//!
//! let seq = Sequencer::new(&[track], 120.0)?;
//! assert_eq!(seq.mix().len(), 24000 + 12000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod note;
pub mod pitch;
pub mod playback;
pub mod score;
pub mod sequencer;
pub mod track;
pub mod waveform;

pub use config::Config;
pub use error::{
    ConfigError, ExportError, NoteNameError, PlaybackError, ScoreError, SequencerError,
};
pub use note::Note;
pub use pitch::{NotationStyle, PitchClass, PitchResolver, semitone_to_frequency};
pub use score::Score;
pub use sequencer::Sequencer;
pub use track::Track;
pub use waveform::{PhasePolicy, Waveform, WaveformGenerator};
