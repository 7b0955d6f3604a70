//! PCM tone synthesis.
//!
//! Everything here is pure and deterministic: a stream's bytes depend only on
//! its parameters and absolute position, never on how the consumer pulls them.

pub mod envelope;
pub mod format;
pub mod oscillator;
pub mod stream;
