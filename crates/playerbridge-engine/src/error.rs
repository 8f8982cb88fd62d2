//! Error types for the bridge actor.

use thiserror::Error;

/// Errors surfaced by [`BridgeHandle`](crate::BridgeHandle) operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge actor is no longer running.
    #[error("bridge actor is no longer running")]
    Disconnected,
}
