//! Position-addressed sine oscillator.
//!
//! Unlike a phase accumulator, every sample is computed from its absolute
//! frame index, so the output for a frame never depends on how generation
//! was split across calls.

use std::f64::consts::PI;

/// Fixed attenuation applied to every tone (30% of full scale), leaving room
/// for the backend to sum several notes without clipping.
pub const HEADROOM: f64 = 0.3;

/// A sine tone at a fixed frequency and sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f64,
    pub sample_rate: f64,
    pub amplitude: f64,
}

impl Tone {
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        Tone {
            frequency,
            sample_rate,
            amplitude: HEADROOM,
        }
    }

    /// Analog sample at absolute frame `position`.
    pub fn sample_at(&self, position: u64) -> f64 {
        (2.0 * PI * position as f64 * self.frequency / self.sample_rate).sin() * self.amplitude
    }
}
