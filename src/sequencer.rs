//! Renders tracks and mixes them into one mono buffer.
//!
//! Tracks are rendered once, when the sequencer is built. Shorter renders are
//! padded with trailing silence to the longest one, and the mix is the mean
//! of all tracks at each sample index. Averaging keeps the sum from growing
//! with the track count; it also makes every extra track quieter.

use log::{info, warn};

use crate::config::Config;
use crate::error::SequencerError;
use crate::track::Track;

/// Rendered, equal-length track buffers at a fixed sample rate.
#[derive(Debug, Clone)]
pub struct Sequencer {
    waves: Vec<Vec<f64>>,
    bpm: f64,
    ticks_per_quarter_note: u32,
    sample_rate: u32,
}

impl Sequencer {
    /// Render `tracks` at `bpm` with the default resolution (480 ticks per
    /// quarter note) and sample rate (48 kHz).
    pub fn new(tracks: &[Track], bpm: f64) -> Result<Self, SequencerError> {
        let config = Config {
            bpm,
            ..Config::default()
        };
        Self::with_config(tracks, &config)
    }

    /// Render `tracks` with the tempo, resolution and sample rate of `config`.
    pub fn with_config(tracks: &[Track], config: &Config) -> Result<Self, SequencerError> {
        if tracks.is_empty() {
            return Err(SequencerError::NoTracks);
        }
        config
            .validate()
            .map_err(|e| SequencerError::InvalidTiming(e.to_string()))?;

        let Config {
            bpm,
            ticks_per_quarter_note,
            sample_rate,
            ..
        } = *config;

        let mut waves: Vec<Vec<f64>> = tracks
            .iter()
            .map(|t| t.render(bpm, ticks_per_quarter_note, sample_rate))
            .collect();

        let max_len = waves.iter().map(Vec::len).max().unwrap_or(0);
        for wave in &mut waves {
            wave.resize(max_len, 0.0);
        }

        info!(
            "sequenced {} tracks: {} samples ({:.3} s at {} Hz)",
            waves.len(),
            max_len,
            max_len as f64 / sample_rate as f64,
            sample_rate
        );

        Ok(Self {
            waves,
            bpm,
            ticks_per_quarter_note,
            sample_rate,
        })
    }

    /// Per-track buffers after padding; all have the same length.
    pub fn waves(&self) -> &[Vec<f64>] {
        &self.waves
    }

    pub fn track_count(&self) -> usize {
        self.waves.len()
    }

    /// Length of the mix in samples
    pub fn len(&self) -> usize {
        self.waves.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn ticks_per_quarter_note(&self) -> u32 {
        self.ticks_per_quarter_note
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration of the mix in seconds
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Mean across tracks at every sample index.
    pub fn mix(&self) -> Vec<f64> {
        let count = self.waves.len() as f64;
        let mut mixed = vec![0.0; self.len()];
        for wave in &self.waves {
            for (out, s) in mixed.iter_mut().zip(wave) {
                *out += s;
            }
        }
        for out in &mut mixed {
            *out /= count;
        }
        mixed
    }

    /// The mix as 32-bit samples for playback or export. Values are not
    /// clamped; a warning is logged when any sample leaves `[-1, 1]`.
    pub fn mix_f32(&self) -> Vec<f32> {
        let mixed = self.mix();
        let peak = mixed.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        if peak > 1.0 {
            warn!("mix peaks at {:.3}; output will clip on a [-1, 1] device", peak);
        }
        mixed.into_iter().map(|s| s as f32).collect()
    }
}
