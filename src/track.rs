use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::note::Note;
use crate::waveform::{PhasePolicy, Waveform, WaveformGenerator};

/// An ordered, append-only list of notes played through one generator.
#[derive(Clone)]
pub struct Track {
    name: String,
    generator: Arc<dyn WaveformGenerator>,
    // Linear multiplier, not dB.
    gain: f64,
    phase: PhasePolicy,
    notes: Vec<Note>,
}

impl Track {
    pub fn new(generator: impl WaveformGenerator + 'static) -> Self {
        Self {
            name: String::from("default"),
            generator: Arc::new(generator),
            gain: 1.0,
            phase: PhasePolicy::Reset,
            notes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_phase_policy(mut self, phase: PhasePolicy) -> Self {
        self.phase = phase;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn phase_policy(&self) -> PhasePolicy {
        self.phase
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Add a note after the last one.
    pub fn append(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Total length in ticks
    pub fn ticks(&self) -> u64 {
        self.notes.iter().map(|n| n.ticks() as u64).sum()
    }

    /// Number of samples [`render`](Self::render) will produce.
    pub fn sample_count(&self, bpm: f64, ticks_per_quarter_note: u32, sample_rate: u32) -> usize {
        self.notes
            .iter()
            .map(|n| n.sample_count(bpm, ticks_per_quarter_note, sample_rate))
            .sum()
    }

    /// Concatenate the waveform of every note, in insertion order.
    pub fn render(&self, bpm: f64, ticks_per_quarter_note: u32, sample_rate: u32) -> Vec<f64> {
        let mut wave: Vec<f64> = Vec::new();

        for note in &self.notes {
            let start = match self.phase {
                PhasePolicy::Reset => 0,
                PhasePolicy::Continuous => wave.len(),
            };
            wave.extend(self.generator.generate_from(
                note,
                bpm,
                ticks_per_quarter_note,
                sample_rate,
                self.gain,
                start,
            ));
        }

        debug!(
            "rendered track '{}': {} notes, {} samples",
            self.name,
            self.notes.len(),
            wave.len()
        );
        wave
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new(Waveform::Sine)
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("gain", &self.gain)
            .field("phase", &self.phase)
            .field("notes", &self.notes)
            .finish_non_exhaustive()
    }
}
