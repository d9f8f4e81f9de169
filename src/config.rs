//! Render settings, optionally loaded from a `key: value` file.
//!
//! ```text
//! # defaults shown
//! sample_rate: 48000
//! notation_style: yamaha
//! ticks_per_quarter_note: 480
//! bpm: 120
//! ```

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::pitch::{NotationStyle, PitchResolver};

pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_TICKS_PER_QUARTER_NOTE: u32 = 480;
pub const DEFAULT_BPM: f64 = 120.0;

/// Settings shared by the resolver, the tracks and the sequencer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Octave numbering used to read note names
    pub notation_style: NotationStyle,
    /// Ticks in one quarter-note beat
    pub ticks_per_quarter_note: u32,
    /// Tempo in quarter notes per minute
    pub bpm: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            notation_style: NotationStyle::default(),
            ticks_per_quarter_note: DEFAULT_TICKS_PER_QUARTER_NOTE,
            bpm: DEFAULT_BPM,
        }
    }
}

/// True for lines that carry no setting: blanks and `#` comments.
pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Split a "key: value" line, trimming both halves.
pub(crate) fn split_kv(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    Some((key.trim(), value.trim()))
}

impl Config {
    /// Load a config file, starting from the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Config::default();
        config.apply(&content)?;
        Ok(config)
    }

    /// Apply every setting in `content` on top of `self`.
    pub fn apply(&mut self, content: &str) -> Result<(), ConfigError> {
        for (line_idx, line) in content.lines().enumerate() {
            let line_num = line_idx + 1;
            if is_blank_or_comment(line) {
                continue;
            }
            let (key, value) = split_kv(line).ok_or_else(|| ConfigError::Parse {
                line: line_num,
                message: format!("expected 'key: value', found '{}'", line.trim()),
            })?;
            self.set(key, value)
                .map_err(|message| ConfigError::Parse { line: line_num, message })?;
        }
        self.validate()
    }

    /// Set one setting by name. Returns `Ok(false)` for unknown keys.
    pub(crate) fn try_set(&mut self, key: &str, value: &str) -> Result<bool, String> {
        match key {
            "sample_rate" => {
                self.sample_rate = value
                    .parse()
                    .map_err(|_| format!("invalid sample_rate: {}", value))?;
            }
            "notation_style" | "style" => {
                self.notation_style = value.parse().map_err(|e| format!("{}", e))?;
            }
            "ticks_per_quarter_note" | "bpqn" => {
                self.ticks_per_quarter_note = value
                    .parse()
                    .map_err(|_| format!("invalid ticks_per_quarter_note: {}", value))?;
            }
            "bpm" | "tempo" => {
                self.bpm = value
                    .parse()
                    .map_err(|_| format!("invalid bpm: {}", value))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        if self.try_set(key, value)? {
            Ok(())
        } else {
            Err(format!("unknown key '{}'", key))
        }
    }

    /// Range checks: every setting must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid {
                key: "sample_rate",
                message: "must be positive".into(),
            });
        }
        if self.ticks_per_quarter_note == 0 {
            return Err(ConfigError::Invalid {
                key: "ticks_per_quarter_note",
                message: "must be positive".into(),
            });
        }
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(ConfigError::Invalid {
                key: "bpm",
                message: format!("must be a positive number, got {}", self.bpm),
            });
        }
        Ok(())
    }

    /// A resolver for the configured notation style.
    pub fn resolver(&self) -> PitchResolver {
        PitchResolver::new(self.notation_style)
    }
}
