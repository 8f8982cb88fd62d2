//! Core bridge actor for the player bridge.
//!
//! This crate coordinates the command queue, playback state machine, event
//! normalizer, and reconciliation layer into one serialized actor that sits
//! between a declarative UI layer and an asynchronous media engine.

mod bridge;
mod error;
mod machine;
mod normalizer;
mod queue;
mod reconcile;

pub use bridge::{Bridge, BridgeHandle, BridgeInput};
pub use error::BridgeError;
pub use machine::PlaybackMachine;
pub use normalizer::EventNormalizer;
pub use queue::{CommandIntent, CommandQueue};

use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;

use playerbridge_ipc::{notification_channel, PlaybackState, PlayerNotification};
use playerbridge_media::{raw_event_channel, EngineAdapter, EngineFactory};

/// Create a bridge actor around engine instances produced by `factory`.
///
/// Returns the actor itself (run it on a dedicated thread or pump it from a
/// host loop), the non-blocking handle for the UI side, and the ordered
/// notification stream.
pub fn create_bridge(
    factory: EngineFactory,
) -> (Bridge, BridgeHandle, Receiver<PlayerNotification>) {
    let (input_tx, input_rx) = crossbeam_channel::unbounded();
    let (raw_tx, raw_rx) = raw_event_channel();
    let (notify_tx, notify_rx) = notification_channel();
    let observed = Arc::new(RwLock::new(PlaybackState::Idle));

    let adapter = EngineAdapter::new(factory, raw_tx);
    let bridge = Bridge::new(input_rx, raw_rx, notify_tx, adapter, Arc::clone(&observed));
    let handle = BridgeHandle::new(input_tx, observed);
    (bridge, handle, notify_rx)
}
