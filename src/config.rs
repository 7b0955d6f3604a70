//! Output configuration shared by every stream of a session.

use serde::{Deserialize, Serialize};

use crate::dsp::format::SampleFormat;
use crate::error::ConfigError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_CHANNEL_COUNT: u16 = 10;

/// Sample rate, channel layout and encoding of the audio output.
///
/// Deserializes from `{"sampleRate": 48000, "channelCount": 2, "format": "f32le"}`;
/// missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConfig {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub format: SampleFormat,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channel_count: DEFAULT_CHANNEL_COUNT,
            format: SampleFormat::default(),
        }
    }
}

impl StreamConfig {
    /// Build a validated config, parsing the format by name (`u8`, `s16le`, `f32le`).
    pub fn new(sample_rate: u32, channel_count: u16, format: &str) -> Result<Self, ConfigError> {
        let config = StreamConfig {
            sample_rate,
            channel_count,
            format: format.parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StreamConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.channel_count == 0 {
            return Err(ConfigError::InvalidChannelCount(self.channel_count));
        }
        Ok(())
    }

    /// Bytes per interleaved frame.
    pub fn frame_size(&self) -> usize {
        self.channel_count as usize * self.format.bytes_per_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channel_count, 10);
        assert_eq!(config.format, SampleFormat::S16Le);
        assert_eq!(config.frame_size(), 20);
    }

    #[test]
    fn new_parses_format_name() {
        let config = StreamConfig::new(48000, 2, "f32le").unwrap();
        assert_eq!(config.format, SampleFormat::F32Le);
        assert_eq!(config.frame_size(), 8);
    }

    #[test]
    fn new_rejects_unknown_format() {
        let err = StreamConfig::new(44100, 2, "pcm24").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownFormat {
                name: "pcm24".to_string()
            }
        );
    }

    #[test]
    fn new_rejects_zero_channels() {
        assert_eq!(
            StreamConfig::new(44100, 0, "u8"),
            Err(ConfigError::InvalidChannelCount(0))
        );
        assert_eq!(
            StreamConfig::new(0, 1, "u8"),
            Err(ConfigError::InvalidSampleRate(0))
        );
    }

    #[test]
    fn json_partial_uses_defaults() {
        let config = StreamConfig::from_json(r#"{"format": "u8"}"#).unwrap();
        assert_eq!(config.format, SampleFormat::U8);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.channel_count, DEFAULT_CHANNEL_COUNT);
    }

    #[test]
    fn json_full() {
        let config =
            StreamConfig::from_json(r#"{"sampleRate": 22050, "channelCount": 1, "format": "f32le"}"#)
                .unwrap();
        assert_eq!(config, StreamConfig::new(22050, 1, "f32le").unwrap());
    }

    #[test]
    fn json_bad_format_is_error() {
        let err = StreamConfig::from_json(r#"{"format": "s32le"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err:?}");
    }
}
