//! Notifications dispatched from the bridge to its subscribers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{Track, VideoSize};

/// Media facts captured once per session, on the transition into `Ready`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Media duration in milliseconds.
    pub duration: u64,

    /// Playhead position in milliseconds at capture time.
    pub target: u64,

    /// Decoded video dimensions.
    pub video_size: VideoSize,

    /// Selectable audio tracks.
    pub audio_tracks: Vec<Track>,

    /// Selectable text tracks.
    pub text_tracks: Vec<Track>,
}

/// One progress tick, derived per confirmed time change. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSample {
    /// Playhead in milliseconds.
    pub current_time: u64,

    /// Playhead as a fraction of the duration, 0.0 - 1.0.
    pub position: f64,

    /// Media duration in milliseconds.
    pub duration: u64,

    /// Echo of `current_time` for correlation.
    pub target: u64,

    /// Milliseconds left until end of media.
    pub remaining_time: u64,

    /// Input buffering speed reported by the engine, kbit/s.
    pub buffering_speed: f32,

    /// Whether the session's initial start-time seek was released and
    /// confirmed before playback first started.
    pub start_time_set_successfully: bool,
}

/// Ordered notification stream delivered to subscribers.
///
/// `target` fields echo the last confirmed playhead position in
/// milliseconds, for correlating a notification with the command that
/// caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerNotification {
    /// A new source was bound and an engine instance created.
    LoadStart { target: u64 },

    /// The engine confirmed it began opening the source.
    Open { target: u64 },

    /// Metadata loaded; sent once per session.
    Load(VideoInfo),

    /// Playback started or resumed.
    Playing {
        duration: u64,
        target: u64,
        seekable: bool,
    },

    /// Progress tick.
    Progress(ProgressSample),

    /// Playback paused.
    Paused { target: u64 },

    /// Engine confirmed a stop.
    Stopped { target: u64 },

    /// Playback stalled on input.
    Buffering { target: u64 },

    /// End of media reached.
    Ended { target: u64 },

    /// Engine failure; the session is dead until a new source is bound.
    Error {
        target: u64,
        code: i32,
        message: String,
    },

    /// A snapshot request could not be served.
    SnapshotFailed {
        target: u64,
        path: PathBuf,
        message: String,
    },

    /// The host surface toggled fullscreen.
    FullScreenChange { target: u64 },
}
