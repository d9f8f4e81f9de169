//! Per-note waveform synthesis.
//!
//! Every note is rendered on its own: sample `i` of a note is
//! `gain * shape(2π * i * freq / sample_rate)`, with `i` starting at 0. No
//! phase is carried from one note to the next unless a track opts into
//! [`PhasePolicy::Continuous`].

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;
use crate::note::Note;

/// Produces the samples of a single note.
///
/// Implementors only describe one period through [`shape`](Self::shape);
/// timing, gain and rest handling are shared. Any `Fn(f64) -> f64` closure is
/// a generator too.
pub trait WaveformGenerator: Send + Sync {
    /// Amplitude in `[-1, 1]` at `phase` radians.
    fn shape(&self, phase: f64) -> f64;

    /// Render `note` starting at phase 0.
    fn generate(
        &self,
        note: &Note,
        bpm: f64,
        ticks_per_quarter_note: u32,
        sample_rate: u32,
        gain: f64,
    ) -> Vec<f64> {
        self.generate_from(note, bpm, ticks_per_quarter_note, sample_rate, gain, 0)
    }

    /// Render `note` as if its first sample were sample `start` of the
    /// waveform. Rests are always silent, whatever the shape.
    fn generate_from(
        &self,
        note: &Note,
        bpm: f64,
        ticks_per_quarter_note: u32,
        sample_rate: u32,
        gain: f64,
        start: usize,
    ) -> Vec<f64> {
        let len = note.sample_count(bpm, ticks_per_quarter_note, sample_rate);
        if note.is_rest() {
            return vec![0.0; len];
        }

        let freq = note.freq();
        let rate = sample_rate as f64;
        (start..start + len)
            .map(|i| gain * self.shape(i as f64 * 2.0 * PI * freq / rate))
            .collect()
    }
}

impl<F> WaveformGenerator for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn shape(&self, phase: f64) -> f64 {
        self(phase)
    }
}

/// Built-in waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    /// 50% duty cycle: +1 for the first half-period, -1 for the second
    Square,
    /// Symmetric ramp: -1 at phase 0, +1 at half-period
    Triangle,
}

impl WaveformGenerator for Waveform {
    fn shape(&self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.rem_euclid(TAU) < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                let x = phase.rem_euclid(TAU);
                if x < PI {
                    2.0 * x / PI - 1.0
                } else {
                    3.0 - 2.0 * x / PI
                }
            }
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Sine => write!(f, "sine"),
            Waveform::Square => write!(f, "square"),
            Waveform::Triangle => write!(f, "triangle"),
        }
    }
}

impl FromStr for Waveform {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            _ => Err(UnknownVariant {
                kind: "waveform",
                value: s.trim().to_string(),
            }),
        }
    }
}

/// Where each note of a track starts its waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhasePolicy {
    /// Every note starts at phase 0.
    #[default]
    Reset,
    /// Each note picks up the sample index where the previous one stopped.
    Continuous,
}

impl fmt::Display for PhasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhasePolicy::Reset => write!(f, "reset"),
            PhasePolicy::Continuous => write!(f, "continuous"),
        }
    }
}

impl FromStr for PhasePolicy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(PhasePolicy::Reset),
            "continuous" => Ok(PhasePolicy::Continuous),
            _ => Err(UnknownVariant {
                kind: "phase policy",
                value: s.trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn a440(ticks: u32) -> Note {
        Note::from_frequency(440.0, ticks)
    }

    #[test]
    fn test_sample_count_matches_duration() {
        for wave in [Waveform::Sine, Waveform::Square, Waveform::Triangle] {
            let out = wave.generate(&a440(480), 120.0, 480, 48000, 1.0);
            assert_eq!(out.len(), 24000);
            let out = wave.generate(&a440(100), 97.0, 480, 44100, 1.0);
            assert_eq!(out.len(), a440(100).sample_count(97.0, 480, 44100));
        }
    }

    #[test]
    fn test_sine_values() {
        let out = Waveform::Sine.generate(&a440(480), 120.0, 480, 48000, 0.5);
        assert_eq!(out[0], 0.0);
        for (i, s) in out.iter().enumerate().take(200) {
            let expected = 0.5 * (i as f64 * 2.0 * PI * 440.0 / 48000.0).sin();
            assert!((s - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn test_square_levels() {
        // 1000 Hz at 7 kHz: 7 samples per period, none on the edge
        let note = Note::from_frequency(1000.0, 480);
        let out = Waveform::Square.generate(&note, 120.0, 480, 7000, 1.0);
        assert_eq!(&out[..7], &[1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_triangle_shape() {
        let note = Note::from_frequency(1000.0, 480);
        let out = Waveform::Triangle.generate(&note, 120.0, 480, 8000, 1.0);
        let expected = [-1.0, -0.5, 0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0];
        for (s, e) in out.iter().zip(expected) {
            assert!((s - e).abs() < EPSILON, "{s} != {e}");
        }
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_rest_is_silent_for_every_shape() {
        for wave in [Waveform::Sine, Waveform::Square, Waveform::Triangle] {
            let out = wave.generate(&Note::rest(480), 120.0, 480, 48000, 1.0);
            assert_eq!(out.len(), 24000);
            assert!(out.iter().all(|&s| s == 0.0), "{wave}");
        }
    }

    #[test]
    fn test_gain_scales_amplitude() {
        let out = Waveform::Square.generate(&a440(480), 120.0, 480, 48000, 0.25);
        assert!(out.iter().all(|&s| s == 0.25 || s == -0.25));
    }

    #[test]
    fn test_zero_ticks_is_empty() {
        assert!(Waveform::Sine.generate(&a440(0), 120.0, 480, 48000, 1.0).is_empty());
    }

    #[test]
    fn test_generate_from_offsets_phase() {
        let whole = Waveform::Sine.generate(&a440(960), 120.0, 480, 48000, 1.0);
        let tail = Waveform::Sine.generate_from(&a440(480), 120.0, 480, 48000, 1.0, 24000);
        for (a, b) in whole[24000..].iter().zip(&tail) {
            assert!((a - b).abs() < EPSILON);
        }
    }

    #[test]
    fn test_closure_generator() {
        let dc = |_phase: f64| 1.0;
        let out = dc.generate(&a440(480), 120.0, 480, 48000, 0.5);
        assert_eq!(out.len(), 24000);
        assert!(out.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Square".parse::<Waveform>().unwrap(), Waveform::Square);
        assert_eq!("sin".parse::<Waveform>().unwrap(), Waveform::Sine);
        assert!("saw".parse::<Waveform>().is_err());
        assert_eq!(
            "continuous".parse::<PhasePolicy>().unwrap(),
            PhasePolicy::Continuous
        );
        assert_eq!(PhasePolicy::default(), PhasePolicy::Reset);
    }
}
