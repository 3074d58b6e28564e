use thiserror::Error;

/// Application-level errors
///
/// Only track- and run-level failures ever reach this type; card and record
/// failures are folded into per-track statistics before they get here.
#[derive(Debug, Error)]
pub enum AppError {
    /// Browser connection or launch failed
    #[error("browser error: {0}")]
    Browser(String),

    /// Config file could not be parsed
    #[error("failed to parse config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid config value
    #[error("invalid config value for {name}: '{value}'")]
    InvalidConfig { name: String, value: String },

    /// File read/write failed
    #[error("file error ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Track-fatal errors: the track is left out of the dataset, the run goes on
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("track {track} unavailable: {reason}")]
    Unavailable { track: String, reason: String },
}

impl TrackError {
    pub fn unavailable(track: impl Into<String>, reason: impl Into<String>) -> Self {
        TrackError::Unavailable {
            track: track.into(),
            reason: reason.into(),
        }
    }
}

/// Card-fatal errors: the card is skipped, the track goes on
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Modal content never populated, after all retries
    #[error("modal did not render within {timeout_ms}ms ({attempts} attempt(s))")]
    ModalTimeout { attempts: u32, timeout_ms: u64 },

    /// Modal rendered but the name slot was empty or unreadable
    #[error("modal rendered without a readable name")]
    ExtractionIncomplete,

    /// Browser protocol error while handling the card
    #[error("browser interaction failed: {0}")]
    Interaction(String),
}

impl CaptureError {
    pub fn interaction(err: impl std::fmt::Display) -> Self {
        CaptureError::Interaction(err.to_string())
    }
}

/// Record-fatal: the record is dropped and counted
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DiscardReason {
    #[error("name is empty after cleaning")]
    EmptyName,
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(err.to_string())
    }
}

impl AppError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(name: impl Into<String>, value: impl Into<String>) -> Self {
        AppError::InvalidConfig {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
