//! Typed UI<->bridge messages for the player bridge.
//!
//! This crate defines all the message types exchanged between a host UI
//! layer and the bridge actor: imperative commands, declarative desired
//! state, the playback state model, and the outgoing notification stream.

mod commands;
mod desired;
mod notify;
mod state;
mod types;

pub use commands::{Command, CommandKind};
pub use desired::DesiredState;
pub use notify::{PlayerNotification, ProgressSample, VideoInfo};
pub use state::PlaybackState;
pub use types::{
    AspectRatio, InitType, MediaSource, ParseAspectRatioError, ResizeMode, SeekTarget, Track,
    TrackKind, VideoSize,
};

use crossbeam_channel::{Receiver, Sender};

/// Creates the notification channel (bridge → UI).
///
/// Unbounded: the notification stream is ordered and must never be silently
/// truncated under a slow subscriber.
pub fn notification_channel() -> (Sender<PlayerNotification>, Receiver<PlayerNotification>) {
    crossbeam_channel::unbounded()
}
