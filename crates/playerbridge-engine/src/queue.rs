//! Pending command queue with per-kind coalescing.

use tracing::{debug, trace};

use playerbridge_ipc::{Command, PlaybackState};

/// A queued command plus the order it was first issued in.
#[derive(Debug, Clone)]
pub struct CommandIntent {
    /// Issue sequence number of the first command this slot represents.
    pub seq: u64,

    /// The surviving (newest) payload for this slot.
    pub command: Command,
}

/// Holds commands that are not yet valid for the current playback state.
///
/// A newly submitted command supersedes any still-pending command of the
/// same kind: the newest payload wins, but the slot keeps its original place
/// in line, so cross-kind ordering stays FIFO by first submission.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: Vec<CommandIntent>,
    next_seq: u64,
}

impl CommandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `command`, coalescing with any pending command of its kind.
    pub fn submit(&mut self, command: Command) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let kind = command.kind();
        if let Some(slot) = self
            .pending
            .iter_mut()
            .find(|intent| intent.command.kind().coalesces_with(kind))
        {
            trace!(?kind, seq, superseded = slot.seq, "coalescing pending command");
            slot.command = command;
        } else {
            trace!(?kind, seq, "queueing command");
            self.pending.push(CommandIntent { seq, command });
        }
    }

    /// Remove and return, in FIFO order, every pending command that is
    /// valid in `state`. Commands that are not ready stay queued.
    pub fn release(&mut self, state: &PlaybackState) -> Vec<Command> {
        let mut released = Vec::new();
        self.pending.retain(|intent| {
            if intent.command.ready_in(state) {
                released.push(intent.command.clone());
                false
            } else {
                true
            }
        });
        if !released.is_empty() {
            debug!(
                count = released.len(),
                state = state.name(),
                "released pending commands"
            );
        }
        released
    }

    /// Discard everything without forwarding.
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "flushing pending commands");
        }
        self.pending.clear();
    }

    /// Number of pending commands.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
