pub mod config;
pub mod dsp;
pub mod error;
pub mod notes;
#[cfg(feature = "playback")]
pub mod session;

pub use crate::config::StreamConfig;
pub use crate::dsp::format::SampleFormat;
pub use crate::dsp::stream::{Fill, WaveformStream};
pub use crate::error::{ConfigError, KeytoneError, SessionError};

use std::time::Duration;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the keytone-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: frequency of the note mapped to the first character of `key`.
#[wasm_bindgen]
pub fn key_frequency(key: &str) -> Option<f64> {
    key.chars().next().and_then(notes::key_frequency)
}

/// Build the stream a press of `key` plays, configured from a JSON
/// `StreamConfig` such as `{"sampleRate": 48000, "format": "f32le"}`.
pub fn note_stream(key: char, duration: Duration, config_json: &str) -> Result<WaveformStream, KeytoneError> {
    let config = StreamConfig::from_json(config_json)?;
    let frequency = notes::key_frequency(key).ok_or(SessionError::UnknownKey(key))?;
    Ok(WaveformStream::from_config(frequency, duration, &config))
}

/// Convert seconds to a `Duration`; negative, NaN and overflowing values
/// become zero, giving an empty stream.
fn duration_from_secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// WASM-exposed tone stream for AudioWorklet-style pull playback.
#[wasm_bindgen]
pub struct WasmToneStream {
    inner: WaveformStream,
}

#[wasm_bindgen]
impl WasmToneStream {
    /// `config` is a plain object such as `{ sampleRate: 48000, channelCount: 2, format: "f32le" }`;
    /// omitted fields take their defaults and `undefined` means all defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(frequency: f64, duration_seconds: f64, config: JsValue) -> Result<WasmToneStream, JsValue> {
        let config: StreamConfig = if config.is_undefined() || config.is_null() {
            StreamConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("{e}")))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&format!("{e}")))?;

        Ok(WasmToneStream {
            inner: WaveformStream::from_config(frequency, duration_from_secs(duration_seconds), &config),
        })
    }

    /// Fill `buf` and return the number of bytes written.
    pub fn fill(&mut self, buf: &mut [u8]) -> usize {
        self.inner.fill(buf).written
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.inner.is_exhausted()
    }

    #[wasm_bindgen(js_name = totalLength)]
    pub fn total_length(&self) -> f64 {
        self.inner.total_length() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_duration_is_empty() {
        assert_eq!(duration_from_secs(-1.0), Duration::ZERO);
        assert_eq!(duration_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(0.5), Duration::from_millis(500));
    }

    #[test]
    fn note_stream_from_key_and_json() {
        let stream = note_stream('h', Duration::from_secs(1), r#"{"channelCount": 1}"#).unwrap();
        assert_eq!(stream.frequency(), 440.0);
        assert_eq!(stream.total_length(), 88200);
        assert_eq!(stream.format(), SampleFormat::S16Le);
    }

    #[test]
    fn note_stream_reports_config_and_key_errors() {
        let err = note_stream('h', Duration::from_secs(1), r#"{"channelCount": 0}"#).unwrap_err();
        assert!(matches!(err, KeytoneError::Config(ConfigError::InvalidChannelCount(0))));

        let err = note_stream('a', Duration::from_secs(1), "{}").unwrap_err();
        assert!(matches!(err, KeytoneError::Session(SessionError::UnknownKey('a'))));
    }

    #[test]
    fn key_lookup_uses_first_char() {
        assert_eq!(key_frequency("h"), Some(440.0));
        assert_eq!(key_frequency(""), None);
    }
}
