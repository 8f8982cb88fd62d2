//! Playback state model.

use serde::{Deserialize, Serialize};

/// Where a playback session currently is.
///
/// Exactly one session holds exactly one state at a time, and the state only
/// moves in response to confirmed engine events, never when a command is
/// merely issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No source bound.
    #[default]
    Idle,

    /// Engine is parsing/buffering the source, metadata not yet available.
    Opening,

    /// Metadata loaded, playback not yet started.
    Ready,

    /// Actively rendering.
    Playing,

    /// Paused with a decoded frame on screen.
    Paused,

    /// Stalled on input mid-playback.
    Buffering,

    /// End of media reached.
    Ended,

    /// Engine reported a failure; terminal until a new source is bound.
    Error {
        /// Engine-reported error code.
        code: i32,
    },
}

impl PlaybackState {
    /// Returns true if no source is bound.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if the engine is still parsing the source.
    pub fn is_opening(&self) -> bool {
        matches!(self, Self::Opening)
    }

    /// Returns true if metadata is loaded but playback has not started.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if actively rendering.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true if stalled on input.
    pub fn is_buffering(&self) -> bool {
        matches!(self, Self::Buffering)
    }

    /// Returns true if the media played to its end.
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Returns true if the session is in the terminal error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns true once media metadata has been loaded.
    pub fn metadata_loaded(&self) -> bool {
        matches!(
            self,
            Self::Ready | Self::Playing | Self::Paused | Self::Buffering
        )
    }

    /// Returns true when at least one frame has been decoded.
    pub fn has_decoded_frame(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::Buffering)
    }

    /// Returns a simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Opening => "Opening",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Buffering => "Buffering",
            Self::Ended => "Ended",
            Self::Error { .. } => "Error",
        }
    }
}
