use crate::error::NoteNameError;
use crate::pitch::PitchResolver;

/// A pitched (or silent) event with a duration in ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    freq: f64,
    ticks: u32,
}

impl Note {
    /// Resolve `name` with `resolver` and pair it with a duration.
    pub fn new(name: &str, ticks: u32, resolver: &PitchResolver) -> Result<Self, NoteNameError> {
        Ok(Self {
            freq: resolver.resolve(name)?,
            ticks,
        })
    }

    /// A note at an explicit frequency. Negative frequencies are clamped to 0.
    pub fn from_frequency(freq: f64, ticks: u32) -> Self {
        Self {
            freq: freq.max(0.0),
            ticks,
        }
    }

    pub fn rest(ticks: u32) -> Self {
        Self { freq: 0.0, ticks }
    }

    /// Frequency in Hz; 0 for a rest
    pub fn freq(&self) -> f64 {
        self.freq
    }

    /// Duration in ticks
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_rest(&self) -> bool {
        self.freq == 0.0
    }

    /// Duration in seconds at the given tempo.
    pub fn duration_secs(&self, bpm: f64, ticks_per_quarter_note: u32) -> f64 {
        self.ticks as f64 / ticks_per_quarter_note as f64 * 60.0 / bpm
    }

    /// Number of samples this note occupies: `floor(seconds * sample_rate)`.
    ///
    /// Timing that yields no finite, positive duration (zero or negative BPM,
    /// zero ticks per quarter note, NaN) gives 0 samples.
    pub fn sample_count(&self, bpm: f64, ticks_per_quarter_note: u32, sample_rate: u32) -> usize {
        let samples =
            (self.duration_secs(bpm, ticks_per_quarter_note) * sample_rate as f64).floor();
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }
}
