//! Error types for the media engine seam.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported synchronously by an engine or the adapter.
///
/// Runtime failures mid-playback are not errors here; they arrive as
/// [`RawEngineEvent::Error`](crate::RawEngineEvent::Error) like every other
/// confirmed engine fact.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source URI does not parse.
    #[error("invalid media uri: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// The engine rejected the source or its options.
    #[error("engine rejected {uri}: {message}")]
    OpenRejected { uri: String, message: String },

    /// The engine could not capture a frame.
    #[error("snapshot to {} failed: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },

    /// No engine instance is bound.
    #[error("no engine instance is bound")]
    NoSession,
}

impl EngineError {
    /// Error code surfaced through the notification stream.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidUri(_) | Self::OpenRejected { .. } => -1,
            Self::Snapshot { .. } => -2,
            Self::NoSession => -3,
        }
    }
}
