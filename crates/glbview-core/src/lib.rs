//! glbview Core - Engine-independent pieces of the glbview viewer
//!
//! This crate provides the parts of the viewer that do not depend on the
//! rendering engine:
//! - Viewer configuration with defaults and page-level overrides
//! - Error types for asset loading and AR sessions
//! - The AR session toggle and the platform trait it drives

pub mod config;
pub mod error;
pub mod session;

pub use config::{CameraConfig, LightConfig, ViewerConfig};
pub use error::{AssetLoadError, ConfigError, SessionError};
pub use session::{toggle_session, SessionSlot, SessionState, ToggleOutcome, XrPlatform};
