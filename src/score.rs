//! Plain-text score files.
//!
//! ```text
//! bpm: 120
//! style: yamaha
//!
//! [track: lead]
//! wave: square
//! gain: 0.5
//! length: 240
//! C3 E3:480 | G#3 R
//! ```
//!
//! Header settings (see [`Config`]) come before any notes. Inside a track,
//! `wave`, `gain`, `length` and `phase` apply to the whole track. Note tokens
//! are `NAME` or `NAME:TICKS`; `|` bar lines are ignored.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::config::{Config, is_blank_or_comment, split_kv};
use crate::error::{ScoreError, SequencerError};
use crate::note::Note;
use crate::pitch::NotationStyle;
use crate::sequencer::Sequencer;
use crate::track::Track;
use crate::waveform::{PhasePolicy, Waveform};

/// A parsed score: its settings and its tracks.
#[derive(Debug, Clone)]
pub struct Score {
    pub config: Config,
    pub tracks: Vec<Track>,
}

impl Score {
    /// Render and pad all tracks.
    pub fn sequencer(&self) -> Result<Sequencer, SequencerError> {
        Sequencer::with_config(&self.tracks, &self.config)
    }
}

/// Track under construction.
struct TrackDraft {
    name: String,
    wave: Waveform,
    gain: f64,
    phase: PhasePolicy,
    length: Option<u32>,
    notes: Vec<Note>,
}

impl TrackDraft {
    fn new(name: String) -> Self {
        Self {
            name,
            wave: Waveform::Sine,
            gain: 1.0,
            phase: PhasePolicy::Reset,
            length: None,
            notes: Vec::new(),
        }
    }

    fn finish(self) -> Track {
        let mut track = Track::new(self.wave)
            .with_name(self.name)
            .with_gain(self.gain)
            .with_phase_policy(self.phase);
        for note in self.notes {
            track.append(note);
        }
        track
    }
}

fn syntax(line: usize, message: String) -> ScoreError {
    ScoreError::Syntax { line, message }
}

/// Load a score file; settings in the file override `base`.
pub fn load(path: &Path, base: Config) -> Result<Score, ScoreError> {
    load_with_style(path, base, None)
}

/// Like [`load`], but a `Some` style wins over any `style:` header.
pub fn load_with_style(
    path: &Path,
    base: Config,
    style: Option<NotationStyle>,
) -> Result<Score, ScoreError> {
    let content = fs::read_to_string(path)?;
    parse_with_style(&content, base, style)
}

/// Parse score text; settings in the text override `base`.
pub fn parse(input: &str, base: Config) -> Result<Score, ScoreError> {
    parse_with_style(input, base, None)
}

/// Like [`parse`], but a `Some` style wins over any `style:` header.
///
/// Notes are resolved as they are read, so the style cannot be patched
/// after parsing the way tempo or sample rate can.
pub fn parse_with_style(
    input: &str,
    base: Config,
    style: Option<NotationStyle>,
) -> Result<Score, ScoreError> {
    let mut config = base;
    if let Some(style) = style {
        config.notation_style = style;
    }
    let mut tracks: Vec<Track> = Vec::new();
    let mut current: Option<TrackDraft> = None;

    for (line_idx, line) in input.lines().enumerate() {
        let line_num = line_idx + 1;
        let trimmed = line.trim();

        if is_blank_or_comment(trimmed) {
            continue;
        }

        // Track header: [track: name]
        if let Some(inner) = trimmed
            .strip_prefix("[track:")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if let Some(draft) = current.take() {
                push_track(&mut tracks, draft);
            }
            config
                .validate()
                .map_err(|e| syntax(line_num, e.to_string()))?;
            current = Some(TrackDraft::new(inner.trim().to_string()));
            continue;
        }

        if let Some((key, value)) = split_kv(trimmed) {
            match (key, current.as_mut()) {
                ("wave", Some(draft)) => {
                    draft.wave = value.parse().map_err(|e| syntax(line_num, format!("{}", e)))?;
                    continue;
                }
                ("gain", Some(draft)) => {
                    draft.gain = value
                        .parse()
                        .map_err(|_| syntax(line_num, format!("invalid gain: {}", value)))?;
                    continue;
                }
                ("phase", Some(draft)) => {
                    draft.phase = value.parse().map_err(|e| syntax(line_num, format!("{}", e)))?;
                    continue;
                }
                ("length", Some(draft)) => {
                    draft.length = Some(parse_ticks(value, line_num)?);
                    continue;
                }
                ("wave" | "gain" | "phase" | "length", None) => {
                    return Err(syntax(
                        line_num,
                        format!("'{}' must appear inside a [track: name] section", key),
                    ));
                }
                (_, None) => {
                    if config.try_set(key, value).map_err(|e| syntax(line_num, e))? {
                        if let Some(style) = style {
                            if config.notation_style != style {
                                debug!("line {}: '{}' ignored, style fixed to {}", line_num, key, style);
                            }
                            config.notation_style = style;
                        }
                        continue;
                    }
                }
                (_, Some(_)) => {
                    let mut scratch = config;
                    if scratch.try_set(key, value).is_ok_and(|known| known) {
                        return Err(syntax(
                            line_num,
                            format!("'{}' must appear before the first track", key),
                        ));
                    }
                }
            }
        }

        // Anything else is a line of notes
        let draft = current.get_or_insert_with(|| TrackDraft::new(String::from("default")));
        let resolver = config.resolver();
        let default_length = draft.length.unwrap_or(config.ticks_per_quarter_note);
        for token in trimmed.split_whitespace() {
            if token == "|" {
                continue;
            }
            let (name, ticks) = match token.split_once(':') {
                Some((name, ticks)) => (name, parse_ticks(ticks, line_num)?),
                None => (token, default_length),
            };
            let note = Note::new(name, ticks, &resolver).map_err(|source| ScoreError::Note {
                line: line_num,
                source,
            })?;
            draft.notes.push(note);
        }
    }

    if let Some(draft) = current.take() {
        push_track(&mut tracks, draft);
    }

    if tracks.is_empty() {
        return Err(ScoreError::Empty);
    }
    config
        .validate()
        .map_err(|e| syntax(input.lines().count(), e.to_string()))?;

    Ok(Score { config, tracks })
}

fn push_track(tracks: &mut Vec<Track>, draft: TrackDraft) {
    if draft.notes.is_empty() {
        warn!("track '{}' has no notes; skipped", draft.name);
        return;
    }
    debug!("parsed track '{}': {} notes", draft.name, draft.notes.len());
    tracks.push(draft.finish());
}

fn parse_ticks(value: &str, line: usize) -> Result<u32, ScoreError> {
    value
        .trim()
        .parse()
        .map_err(|_| syntax(line, format!("invalid tick count: {}", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteNameError;
    use std::io::Write;

    #[test]
    fn test_parse_header_and_tracks() {
        let input = "\
# three voices
bpm: 90
style: international
ticks_per_quarter_note: 96

[track: lead]
wave: square
gain: 0.5
A4:96 R:48 | C#5

[track: bass]
length: 192
phase: continuous
A2 A2";
        let score = parse(input, Config::default()).unwrap();
        assert_eq!(score.config.bpm, 90.0);
        assert_eq!(score.config.notation_style, NotationStyle::International);
        assert_eq!(score.config.ticks_per_quarter_note, 96);
        assert_eq!(score.tracks.len(), 2);

        let lead = &score.tracks[0];
        assert_eq!(lead.name(), "lead");
        assert_eq!(lead.gain(), 0.5);
        let ticks: Vec<u32> = lead.notes().iter().map(|n| n.ticks()).collect();
        assert_eq!(ticks, vec![96, 48, 96]);
        assert_eq!(lead.notes()[0].freq(), 440.0);
        assert!(lead.notes()[1].is_rest());

        let bass = &score.tracks[1];
        assert_eq!(bass.phase_policy(), PhasePolicy::Continuous);
        assert!(bass.notes().iter().all(|n| n.ticks() == 192));
        assert_eq!(bass.notes()[0].freq(), 110.0);
    }

    #[test]
    fn test_notes_without_header_use_default_track() {
        let score = parse("C3 E3 G3", Config::default()).unwrap();
        assert_eq!(score.tracks.len(), 1);
        assert_eq!(score.tracks[0].name(), "default");
        assert_eq!(score.tracks[0].len(), 3);
        assert!(score.tracks[0].notes().iter().all(|n| n.ticks() == 480));
    }

    #[test]
    fn test_base_config_is_overridden() {
        let base = Config {
            notation_style: NotationStyle::International,
            bpm: 60.0,
            ..Config::default()
        };
        let score = parse("A4", base).unwrap();
        assert_eq!(score.config.bpm, 60.0);
        assert_eq!(score.tracks[0].notes()[0].freq(), 440.0);

        let score = parse("style: yamaha\nA3", base).unwrap();
        assert_eq!(score.tracks[0].notes()[0].freq(), 440.0);
    }

    #[test]
    fn test_style_override_beats_header() {
        let base = Config {
            notation_style: NotationStyle::International,
            ..Config::default()
        };
        let input = "style: yamaha\nbpm: 100\n[track: a]\nA4";

        let score = parse_with_style(input, base, Some(NotationStyle::International)).unwrap();
        assert_eq!(score.config.notation_style, NotationStyle::International);
        assert_eq!(score.config.bpm, 100.0);
        assert_eq!(score.tracks[0].notes()[0].freq(), 440.0);

        // Without the override the header still applies
        let score = parse(input, base).unwrap();
        assert_eq!(score.config.notation_style, NotationStyle::Yamaha);
        assert_eq!(score.tracks[0].notes()[0].freq(), 880.0);
    }

    #[test]
    fn test_style_override_rejects_names_of_header_style() {
        // C9 exists in international numbering but not in yamaha
        let err = parse_with_style(
            "style: international\nC9",
            Config::default(),
            Some(NotationStyle::Yamaha),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScoreError::Note {
                line: 2,
                source: NoteNameError::InvalidOctave(_)
            }
        ));
    }

    #[test]
    fn test_bad_note_reports_line() {
        let err = parse("bpm: 120\n\nC3 E#3", Config::default()).unwrap_err();
        match err {
            ScoreError::Note { line, source } => {
                assert_eq!(line, 3);
                assert_eq!(source, NoteNameError::InvalidAccidental("E#3".into()));
            }
            other => panic!("expected note error, got {other:?}"),
        }
    }

    #[test]
    fn test_header_after_notes_rejected() {
        let err = parse("[track: a]\nC3\nbpm: 100", Config::default()).unwrap_err();
        assert!(matches!(err, ScoreError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_track_setting_outside_track_rejected() {
        let err = parse("wave: sine\nC3", Config::default()).unwrap_err();
        assert!(matches!(err, ScoreError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            parse("[track: a]\nwave: saw\nC3", Config::default()),
            Err(ScoreError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            parse("C3:abc", Config::default()),
            Err(ScoreError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse("bpm: 0\nC3", Config::default()),
            Err(ScoreError::Syntax { .. })
        ));
    }

    #[test]
    fn test_empty_score() {
        assert!(matches!(
            parse("# nothing\nbpm: 100\n[track: a]\n", Config::default()),
            Err(ScoreError::Empty)
        ));
    }

    #[test]
    fn test_score_to_sequencer() {
        let score = parse("[track: a]\nC3 C3\n[track: b]\nE3", Config::default()).unwrap();
        let seq = score.sequencer().unwrap();
        assert_eq!(seq.track_count(), 2);
        assert_eq!(seq.len(), 2 * 24000);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[track: only]").unwrap();
        writeln!(file, "A3:960").unwrap();
        let score = load(file.path(), Config::default()).unwrap();
        assert_eq!(score.tracks[0].ticks(), 960);
    }
}
