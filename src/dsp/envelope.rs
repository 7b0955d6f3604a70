//! Stepped volume envelope applied to a note's player gain.
//!
//! Each step sets the gain to `initial * factor` and holds it for a wall-clock
//! duration; after the last step the gain drops to `initial * release_factor`.

use std::time::Duration;

/// One level of the envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeStep {
    /// Multiplier on the note's initial volume.
    pub factor: f64,
    /// How long the level is held.
    pub hold: Duration,
}

/// A sequence of held gain levels followed by a final release level.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeEnvelope {
    steps: Vec<EnvelopeStep>,
    release_factor: f64,
}

impl Default for VolumeEnvelope {
    /// Full volume for 1 s, half for 1 s, a third for 50 µs, then silence.
    fn default() -> Self {
        VolumeEnvelope::new(vec![
            EnvelopeStep {
                factor: 1.0,
                hold: Duration::from_secs(1),
            },
            EnvelopeStep {
                factor: 1.0 / 2.0,
                hold: Duration::from_secs(1),
            },
            EnvelopeStep {
                factor: 1.0 / 3.0,
                hold: Duration::from_micros(50),
            },
        ])
    }
}

impl VolumeEnvelope {
    pub fn new(steps: Vec<EnvelopeStep>) -> Self {
        VolumeEnvelope {
            steps,
            release_factor: 0.0,
        }
    }

    pub fn with_release_factor(mut self, factor: f64) -> Self {
        self.release_factor = factor;
        self
    }

    pub fn steps(&self) -> &[EnvelopeStep] {
        &self.steps
    }

    pub fn release_factor(&self) -> f64 {
        self.release_factor
    }

    /// Absolute volumes to apply in order, each paired with its hold time.
    /// The release level comes last with a zero hold.
    pub fn schedule(&self, initial: f64) -> impl Iterator<Item = (f64, Duration)> + '_ {
        self.steps
            .iter()
            .map(move |s| (initial * s.factor, s.hold))
            .chain(std::iter::once((initial * self.release_factor, Duration::ZERO)))
    }
}
