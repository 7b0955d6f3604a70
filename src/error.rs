use std::fmt;

#[derive(Debug)]
pub enum KeytoneError {
    Config(ConfigError),
    Session(SessionError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownFormat { name: String },
    InvalidSampleRate(u32),
    InvalidChannelCount(u16),
    Json(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    UnknownKey(char),
    Backend(String),
}

impl fmt::Display for KeytoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeytoneError::Config(e) => write!(f, "Configuration error: {e}"),
            KeytoneError::Session(e) => write!(f, "Session error: {e}"),
        }
    }
}

impl std::error::Error for KeytoneError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFormat { name } => {
                write!(f, "format must be u8, s16le, or f32le but: {name}")
            }
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be positive, got {rate}")
            }
            ConfigError::InvalidChannelCount(count) => {
                write!(f, "channel count must be positive, got {count}")
            }
            ConfigError::Json(msg) => write!(f, "Invalid config JSON: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownKey(key) => write!(f, "No note mapped to key {key:?}"),
            SessionError::Backend(msg) => write!(f, "Audio backend failure: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ConfigError> for KeytoneError {
    fn from(e: ConfigError) -> Self {
        KeytoneError::Config(e)
    }
}

impl From<SessionError> for KeytoneError {
    fn from(e: SessionError) -> Self {
        KeytoneError::Session(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_names_accepted_values() {
        let err = ConfigError::UnknownFormat {
            name: "s24le".to_string(),
        };
        assert_eq!(err.to_string(), "format must be u8, s16le, or f32le but: s24le");
    }

    #[test]
    fn wraps_into_crate_error() {
        let err: KeytoneError = SessionError::UnknownKey('!').into();
        assert!(matches!(err, KeytoneError::Session(SessionError::UnknownKey('!'))));
        assert_eq!(err.to_string(), "Session error: No note mapped to key '!'");
    }
}
