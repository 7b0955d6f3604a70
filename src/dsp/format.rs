//! PCM sample formats and their byte encoders.
//!
//! All encodings are little-endian and bit-exact with standard PCM consumers:
//! `u8` is centered at 128, `s16le` and `f32le` are centered at zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Supported PCM sample encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleFormat {
    /// Unsigned 8-bit, offset 128 = silence.
    #[serde(rename = "u8")]
    U8,
    /// Signed 16-bit little-endian.
    #[default]
    #[serde(rename = "s16le")]
    S16Le,
    /// IEEE-754 32-bit float little-endian.
    #[serde(rename = "f32le")]
    F32Le,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::S16Le => 2,
            SampleFormat::F32Le => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::U8 => "u8",
            SampleFormat::S16Le => "s16le",
            SampleFormat::F32Le => "f32le",
        }
    }

    /// Encode one analog sample into `out`, which must be exactly
    /// `bytes_per_sample()` long.
    ///
    /// Integer formats truncate toward zero.
    pub fn encode(self, sample: f64, out: &mut [u8]) {
        match self {
            SampleFormat::U8 => {
                const MAX: f64 = 127.0;
                out[0] = ((sample * MAX) as i32 + 128) as u8;
            }
            SampleFormat::S16Le => {
                const MAX: f64 = 32767.0;
                out.copy_from_slice(&((sample * MAX) as i16).to_le_bytes());
            }
            SampleFormat::F32Le => {
                out.copy_from_slice(&(sample as f32).to_le_bytes());
            }
        }
    }

    /// Decode one encoded sample back to its analog value.
    pub fn decode(self, bytes: &[u8]) -> f64 {
        match self {
            SampleFormat::U8 => (bytes[0] as f64 - 128.0) / 127.0,
            SampleFormat::S16Le => i16::from_le_bytes([bytes[0], bytes[1]]) as f64 / 32767.0,
            SampleFormat::F32Le => {
                f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
        }
    }

    /// Largest difference between an analog value and its decoded encoding.
    pub fn quantization_step(self) -> f64 {
        match self {
            SampleFormat::U8 => 1.0 / 127.0,
            SampleFormat::S16Le => 1.0 / 32767.0,
            SampleFormat::F32Le => f32::EPSILON as f64,
        }
    }
}

impl FromStr for SampleFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u8" => Ok(SampleFormat::U8),
            "s16le" => Ok(SampleFormat::S16Le),
            "f32le" => Ok(SampleFormat::F32Le),
            other => Err(ConfigError::UnknownFormat {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(format: SampleFormat, sample: f64) -> Vec<u8> {
        let mut out = vec![0; format.bytes_per_sample()];
        format.encode(sample, &mut out);
        out
    }

    #[test]
    fn silence_encodings() {
        assert_eq!(encoded(SampleFormat::U8, 0.0), [128]);
        assert_eq!(encoded(SampleFormat::S16Le, 0.0), [0x00, 0x00]);
        assert_eq!(encoded(SampleFormat::F32Le, 0.0), [0, 0, 0, 0]);
    }

    #[test]
    fn s16_is_little_endian() {
        // 0.3 * 32767 = 9830.1 -> 9830 = 0x2666
        assert_eq!(encoded(SampleFormat::S16Le, 0.3), [0x66, 0x26]);
        // -9830 = 0xD99A
        assert_eq!(encoded(SampleFormat::S16Le, -0.3), [0x9A, 0xD9]);
    }

    #[test]
    fn u8_truncates_toward_zero() {
        // 0.3 * 127 = 38.1 -> 38
        assert_eq!(encoded(SampleFormat::U8, 0.3), [128 + 38]);
        assert_eq!(encoded(SampleFormat::U8, -0.3), [128 - 38]);
    }

    #[test]
    fn f32_is_raw_ieee_bits() {
        let bits = 0.25_f32.to_bits();
        assert_eq!(encoded(SampleFormat::F32Le, 0.25), bits.to_le_bytes());
    }

    #[test]
    fn decode_within_quantization() {
        for format in [SampleFormat::U8, SampleFormat::S16Le, SampleFormat::F32Le] {
            for i in -30..=30 {
                let s = i as f64 / 100.0;
                let back = format.decode(&encoded(format, s));
                assert!(
                    (back - s).abs() <= format.quantization_step(),
                    "{format}: {s} decoded to {back}"
                );
            }
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("u8".parse::<SampleFormat>(), Ok(SampleFormat::U8));
        assert_eq!("s16le".parse::<SampleFormat>(), Ok(SampleFormat::S16Le));
        assert_eq!("f32le".parse::<SampleFormat>(), Ok(SampleFormat::F32Le));
        assert_eq!(
            "S16LE".parse::<SampleFormat>(),
            Err(ConfigError::UnknownFormat {
                name: "S16LE".to_string()
            })
        );
    }

    #[test]
    fn serde_names_match_parse_names() {
        for format in [SampleFormat::U8, SampleFormat::S16Le, SampleFormat::F32Le] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.name()));
        }
    }
}
