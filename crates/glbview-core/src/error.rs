//! Error types shared by the viewer crates

use thiserror::Error;

/// Errors raised while reading viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure to fetch or decode the model asset.
///
/// Recovered locally: the loader logs it and the scene keeps rendering
/// without the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetLoadError {
    #[error("failed to load model from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("model at {url} contains no scene")]
    NoScene { url: String },
}

/// Failure to enter or leave an immersive AR session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("WebXR is not available on this platform")]
    Unsupported,
    #[error("AR session request failed: {0}")]
    Request(String),
    #[error("ending AR session failed: {0}")]
    End(String),
}

impl SessionError {
    /// Text shown to the user in a blocking alert.
    ///
    /// Request failures use fixed text; the underlying detail only goes to the log.
    pub fn alert_message(&self) -> &'static str {
        match self {
            SessionError::Unsupported => "WebXR not supported in this browser.",
            SessionError::Request(_) => "Failed to start AR session:",
            SessionError::End(_) => "Failed to end AR session.",
        }
    }
}
