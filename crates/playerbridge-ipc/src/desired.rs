//! Declarative desired-state snapshots.

use serde::{Deserialize, Serialize};

use crate::types::{AspectRatio, MediaSource, ResizeMode};

/// The latest declarative target configuration from the UI layer.
///
/// Replaced wholesale on every UI update; the reconciliation layer compares
/// consecutive snapshots field by field and emits commands only for the
/// fields that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredState {
    /// Media source to bind; changing it replaces the whole session.
    pub source: Option<MediaSource>,

    /// Side-loaded subtitle file, attached at session open.
    pub subtitle_uri: Option<String>,

    /// Explicit transport state; `None` defers to `autoplay`.
    pub paused: Option<bool>,

    /// Rebind the source and replay when the media ends.
    pub repeat: bool,

    /// Playback rate multiplier.
    pub rate: Option<f32>,

    /// Proportional seek target, 0.0 - 1.0.
    pub seek: Option<f64>,

    /// Absolute seek target in milliseconds.
    pub seek_time: Option<u64>,

    /// Initial playhead in milliseconds, honored once per session.
    pub start_time: Option<u64>,

    /// Output volume, 0.0 - 1.0.
    pub volume: Option<f32>,

    /// Mute output.
    pub muted: Option<bool>,

    /// Audio track selection by engine id.
    pub audio_track: Option<i32>,

    /// Text track selection by engine id.
    pub text_track: Option<i32>,

    /// Keep the session alive while the host view is backgrounded.
    /// View-lifecycle policy; produces no engine command.
    pub play_in_background: bool,

    /// Fixed display aspect ratio.
    pub video_aspect_ratio: Option<AspectRatio>,

    /// Derive the aspect ratio from the source instead.
    pub auto_aspect_ratio: bool,

    /// How the video surface fits its container.
    /// View-layout policy; produces no engine command.
    pub resize_mode: Option<ResizeMode>,

    /// Start playback as soon as the session is ready when `paused` is
    /// unset. Defaults to true.
    pub autoplay: bool,
}

impl Default for DesiredState {
    fn default() -> Self {
        Self {
            source: None,
            subtitle_uri: None,
            paused: None,
            repeat: false,
            rate: None,
            seek: None,
            seek_time: None,
            start_time: None,
            volume: None,
            muted: None,
            audio_track: None,
            text_track: None,
            play_in_background: false,
            video_aspect_ratio: None,
            auto_aspect_ratio: false,
            resize_mode: None,
            autoplay: true,
        }
    }
}

impl DesiredState {
    /// Whether a freshly opened session should start playing.
    pub fn wants_playback(&self) -> bool {
        match self.paused {
            Some(paused) => !paused,
            None => self.autoplay,
        }
    }
}
