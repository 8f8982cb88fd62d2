//! Control commands issued against the engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::PlaybackState;
use crate::types::{AspectRatio, SeekTarget};

/// A requested control action.
///
/// Commands are queued by the bridge and only handed to the engine once the
/// playback state makes them meaningful; see [`Command::ready_in`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Start or resume playback.
    Play,

    /// Pause playback.
    Pause,

    /// Move the playhead.
    Seek(SeekTarget),

    /// Position to start from, in milliseconds. Applied once per session.
    SetStartTime(u64),

    /// Playback rate multiplier.
    SetRate(f32),

    /// Output volume, 0.0 - 1.0.
    SetVolume(f32),

    /// Mute or unmute output.
    SetMuted(bool),

    /// Select an audio track by engine id.
    SetAudioTrack(i32),

    /// Select a text track by engine id.
    SetTextTrack(i32),

    /// Force a fixed display aspect ratio.
    SetAspectRatio(AspectRatio),

    /// Let the engine derive the aspect ratio from the source.
    SetAutoAspectRatio(bool),

    /// Capture the current frame to the given path.
    Snapshot(PathBuf),
}

/// Discriminant used for coalescing pending commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Play,
    Pause,
    Seek,
    SetStartTime,
    SetRate,
    SetVolume,
    SetMuted,
    SetAudioTrack,
    SetTextTrack,
    SetAspectRatio,
    SetAutoAspectRatio,
    Snapshot,
}

impl CommandKind {
    /// Whether a pending command of this kind is superseded by a newer one
    /// of `other`.
    ///
    /// `Play` and `Pause` are opposite values of the same transport control,
    /// so they supersede each other; every other kind only coalesces with
    /// itself.
    pub fn coalesces_with(self, other: CommandKind) -> bool {
        if self == other {
            return true;
        }
        matches!(
            (self, other),
            (Self::Play, Self::Pause) | (Self::Pause, Self::Play)
        )
    }
}

impl Command {
    /// The coalescing discriminant of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Play => CommandKind::Play,
            Self::Pause => CommandKind::Pause,
            Self::Seek(_) => CommandKind::Seek,
            Self::SetStartTime(_) => CommandKind::SetStartTime,
            Self::SetRate(_) => CommandKind::SetRate,
            Self::SetVolume(_) => CommandKind::SetVolume,
            Self::SetMuted(_) => CommandKind::SetMuted,
            Self::SetAudioTrack(_) => CommandKind::SetAudioTrack,
            Self::SetTextTrack(_) => CommandKind::SetTextTrack,
            Self::SetAspectRatio(_) => CommandKind::SetAspectRatio,
            Self::SetAutoAspectRatio(_) => CommandKind::SetAutoAspectRatio,
            Self::Snapshot(_) => CommandKind::Snapshot,
        }
    }

    /// Whether this command may be handed to the engine while in `state`.
    ///
    /// Transport and seek commands need loaded metadata; tuning commands
    /// only need a bound, non-failed session; snapshots need a decoded
    /// frame. Commands that are not ready stay queued (snapshots excepted;
    /// the bridge rejects those up front).
    pub fn ready_in(&self, state: &PlaybackState) -> bool {
        match self.kind() {
            CommandKind::Play
            | CommandKind::Pause
            | CommandKind::Seek
            | CommandKind::SetStartTime
            | CommandKind::SetAudioTrack
            | CommandKind::SetTextTrack => state.metadata_loaded(),
            CommandKind::SetRate
            | CommandKind::SetVolume
            | CommandKind::SetMuted
            | CommandKind::SetAspectRatio
            | CommandKind::SetAutoAspectRatio => !state.is_idle() && !state.is_error(),
            CommandKind::Snapshot => state.has_decoded_frame(),
        }
    }
}
