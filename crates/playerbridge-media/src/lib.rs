//! Media engine seam for the player bridge.
//!
//! This crate defines the imperative surface an external playback engine
//! must provide ([`MediaEngine`]), the closed set of raw events an engine
//! reports back ([`RawEngineEvent`]), and the [`EngineAdapter`] that owns at
//! most one engine instance and stamps its events with a session generation
//! so stale callbacks can be discarded after teardown.

mod adapter;
mod engine;
mod error;
mod events;
pub mod mock;

pub use adapter::EngineAdapter;
pub use engine::{EngineFactory, MediaEngine};
pub use error::EngineError;
pub use events::{EventSink, MediaMetadata, RawEngineEvent, SessionEvent};

use crossbeam_channel::{Receiver, Sender};

/// Creates the raw event channel (engine → bridge).
///
/// Unbounded: an engine callback must never block or drop on a busy bridge.
pub fn raw_event_channel() -> (Sender<SessionEvent>, Receiver<SessionEvent>) {
    crossbeam_channel::unbounded()
}
