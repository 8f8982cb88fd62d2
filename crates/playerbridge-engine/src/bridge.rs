//! The bridge actor and its non-blocking handle.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, trace, warn};

use playerbridge_ipc::{
    AspectRatio, Command, DesiredState, MediaSource, PlaybackState, PlayerNotification, SeekTarget,
};
use playerbridge_media::{EngineAdapter, SessionEvent};

use crate::error::BridgeError;
use crate::machine::PlaybackMachine;
use crate::normalizer::EventNormalizer;
use crate::queue::CommandQueue;
use crate::reconcile;

/// Inputs accepted by the bridge actor.
#[derive(Debug)]
pub enum BridgeInput {
    /// Replace the declarative desired-state snapshot.
    Desired(Box<DesiredState>),

    /// One imperative control command.
    Command(Command),

    /// Stop the actor.
    Shutdown,
}

/// One bound media source and its lifecycle bookkeeping.
#[derive(Debug)]
struct Session {
    generation: u64,
    source: MediaSource,
}

/// The player control bridge: a single serialized actor per bound source.
///
/// Both input directions (UI commands/snapshots and raw engine events)
/// funnel through this one actor, which is what makes the state machine
/// sound without any locking of its own.
pub struct Bridge {
    input_rx: Receiver<BridgeInput>,
    raw_rx: Receiver<SessionEvent>,
    notify_tx: Sender<PlayerNotification>,
    adapter: EngineAdapter,
    queue: CommandQueue,
    machine: PlaybackMachine,
    normalizer: EventNormalizer,
    desired: Option<DesiredState>,
    session: Option<Session>,
    observed: Arc<RwLock<PlaybackState>>,
}

impl Bridge {
    pub(crate) fn new(
        input_rx: Receiver<BridgeInput>,
        raw_rx: Receiver<SessionEvent>,
        notify_tx: Sender<PlayerNotification>,
        adapter: EngineAdapter,
        observed: Arc<RwLock<PlaybackState>>,
    ) -> Self {
        Self {
            input_rx,
            raw_rx,
            notify_tx,
            adapter,
            queue: CommandQueue::new(),
            machine: PlaybackMachine::default(),
            normalizer: EventNormalizer::default(),
            desired: None,
            session: None,
            observed,
        }
    }

    /// Run the actor until shutdown (blocking).
    pub fn run(&mut self) {
        info!("player bridge running");
        let input_rx = self.input_rx.clone();
        let raw_rx = self.raw_rx.clone();
        loop {
            select! {
                recv(input_rx) -> msg => match msg {
                    Ok(input) => {
                        if !self.handle_input(input) {
                            break;
                        }
                    }
                    Err(_) => {
                        info!("input channel disconnected, shutting down");
                        break;
                    }
                },
                recv(raw_rx) -> msg => {
                    if let Ok(event) = msg {
                        self.handle_raw(event);
                    }
                },
            }
        }
        self.teardown();
        info!("player bridge stopped");
    }

    /// Drain every input and raw event already queued, without blocking.
    ///
    /// Lets a host event loop drive the actor on its own thread instead of
    /// dedicating one to [`run`](Self::run).
    pub fn pump(&mut self) {
        loop {
            if let Ok(input) = self.input_rx.try_recv() {
                if !self.handle_input(input) {
                    self.teardown();
                    return;
                }
                continue;
            }
            if let Ok(event) = self.raw_rx.try_recv() {
                self.handle_raw(event);
                continue;
            }
            break;
        }
    }

    /// Handle one input. Returns false when the actor should stop.
    fn handle_input(&mut self, input: BridgeInput) -> bool {
        trace!(?input, "handling input");
        match input {
            BridgeInput::Desired(next) => self.apply_desired(*next),
            BridgeInput::Command(command) => self.submit(command),
            BridgeInput::Shutdown => return false,
        }
        true
    }

    /// Reconcile a new desired-state snapshot against the previous one.
    #[instrument(name = "apply_desired", skip(self, next))]
    fn apply_desired(&mut self, next: DesiredState) {
        let source_changed = reconcile::source_changed(
            self.session.as_ref().map(|session| &session.source),
            next.source.as_ref(),
        );

        if source_changed {
            self.open_session(&next);
        } else if self.session.is_some() {
            let prev = self.desired.clone().unwrap_or_default();
            if next.subtitle_uri != prev.subtitle_uri {
                if let Some(uri) = &next.subtitle_uri {
                    if let Err(error) = self.adapter.set_subtitle(uri) {
                        warn!(%error, "subtitle attach failed");
                    }
                }
            }
            for command in reconcile::diff(&prev, &next) {
                self.submit(command);
            }
        }

        self.desired = Some(next);
    }

    /// Tear the current session down and bind `desired.source` as a fresh
    /// one, seeding its initial commands from the full snapshot.
    #[instrument(name = "open_session", skip(self, desired))]
    fn open_session(&mut self, desired: &DesiredState) {
        // Full teardown before the next engine instance exists: no overlap,
        // and nothing pending survives into the new generation.
        self.queue.flush();
        self.adapter.close_session();
        self.machine.reset();
        self.normalizer.reset();
        self.session = None;
        self.publish_state();

        let Some(source) = desired.source.as_ref() else {
            debug!("source cleared, staying idle");
            return;
        };

        match self
            .adapter
            .open_session(source, desired.subtitle_uri.as_deref())
        {
            Ok(generation) => {
                info!(generation, uri = %source.uri, "session opened");
                self.session = Some(Session {
                    generation,
                    source: source.clone(),
                });
                self.machine.open();
                if let Some(ms) = desired.start_time.filter(|&ms| ms > 0) {
                    self.normalizer.plan_start_time(ms);
                }
                self.notify(PlayerNotification::LoadStart {
                    target: self.normalizer.target(),
                });
                for command in reconcile::seed(desired) {
                    self.submit(command);
                }
            }
            Err(error) => {
                warn!(%error, uri = %source.uri, "engine rejected source");
                self.machine.engine_error(error.code());
                self.notify(PlayerNotification::Error {
                    target: self.normalizer.target(),
                    code: error.code(),
                    message: error.to_string(),
                });
            }
        }
        self.publish_state();
    }

    /// Queue one command and forward whatever has become valid.
    fn submit(&mut self, command: Command) {
        if self.session.is_none() {
            debug!(kind = ?command.kind(), "no session bound, dropping command");
            return;
        }

        // Snapshot is user-imperative with no sensible buffering semantics:
        // reject it up front instead of queueing.
        if let Command::Snapshot(path) = &command {
            if !self.machine.state().has_decoded_frame() {
                warn!(state = self.machine.state().name(), "snapshot with no decoded frame");
                self.notify(PlayerNotification::SnapshotFailed {
                    target: self.normalizer.target(),
                    path: path.clone(),
                    message: format!("no decoded frame in state {}", self.machine.state().name()),
                });
                return;
            }
        }

        self.queue.submit(command);
        self.release_ready();
    }

    /// Forward every queued command the current state makes valid.
    fn release_ready(&mut self) {
        for command in self.queue.release(self.machine.state()) {
            if matches!(command, Command::SetStartTime(_)) {
                self.normalizer.start_time_released();
            }
            match self.adapter.apply(&command) {
                Ok(()) => trace!(kind = ?command.kind(), "command forwarded to engine"),
                Err(error) => {
                    if let Command::Snapshot(path) = &command {
                        self.notify(PlayerNotification::SnapshotFailed {
                            target: self.normalizer.target(),
                            path: path.clone(),
                            message: error.to_string(),
                        });
                    } else {
                        warn!(kind = ?command.kind(), %error, "engine call failed");
                    }
                }
            }
        }
    }

    /// Apply one raw engine event, discarding stale generations.
    fn handle_raw(&mut self, event: SessionEvent) {
        let current = match self.session.as_ref() {
            Some(session) => session.generation,
            None => {
                trace!(generation = event.generation, "raw event with no session, discarded");
                return;
            }
        };
        if event.generation != current {
            debug!(
                stale = event.generation,
                current, "discarding stale raw event"
            );
            return;
        }

        let was_error = self.machine.state().is_error();
        let notifications = self.normalizer.on_raw(event.event, &mut self.machine);
        if self.machine.state().is_error() && !was_error {
            self.queue.flush();
        }

        for notification in notifications {
            self.notify(notification);
        }
        self.publish_state();
        self.release_ready();

        if self.machine.state().is_ended()
            && self.desired.as_ref().is_some_and(|desired| desired.repeat)
        {
            debug!("repeat enabled, rebinding source");
            if let Some(desired) = self.desired.clone() {
                self.open_session(&desired);
            }
        }
    }

    fn notify(&self, notification: PlayerNotification) {
        if self.notify_tx.send(notification).is_err() {
            warn!("notification dropped: subscriber receiver is gone");
        }
    }

    fn publish_state(&self) {
        *self.observed.write() = self.machine.state().clone();
    }

    fn teardown(&mut self) {
        self.queue.flush();
        self.adapter.close_session();
        self.machine.reset();
        self.normalizer.reset();
        self.session = None;
        self.publish_state();
    }
}

/// Cloneable, non-blocking front half of the bridge.
///
/// Every method returns immediately; actual engine interaction happens on
/// the actor.
#[derive(Clone)]
pub struct BridgeHandle {
    input_tx: Sender<BridgeInput>,
    observed: Arc<RwLock<PlaybackState>>,
}

impl BridgeHandle {
    pub(crate) fn new(input_tx: Sender<BridgeInput>, observed: Arc<RwLock<PlaybackState>>) -> Self {
        Self { input_tx, observed }
    }

    /// Replace the declarative desired-state snapshot.
    pub fn update(&self, desired: DesiredState) -> Result<(), BridgeError> {
        self.send(BridgeInput::Desired(Box::new(desired)))
    }

    /// Seek to a fraction of the duration, 0.0 - 1.0.
    pub fn seek(&self, fraction: f64) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::Seek(SeekTarget::Fraction(
            fraction,
        ))))
    }

    /// Seek to an absolute position in milliseconds.
    pub fn seek_time(&self, ms: u64) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::Seek(SeekTarget::Time(ms))))
    }

    /// Set the position playback should start from, in milliseconds.
    pub fn set_start_time(&self, ms: u64) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::SetStartTime(ms)))
    }

    /// Resume (`true`) or pause (`false`) playback.
    pub fn resume(&self, play: bool) -> Result<(), BridgeError> {
        let command = if play { Command::Play } else { Command::Pause };
        self.send(BridgeInput::Command(command))
    }

    /// Capture the current frame to `path`.
    pub fn snapshot(&self, path: impl Into<PathBuf>) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::Snapshot(path.into())))
    }

    /// Force a fixed display aspect ratio.
    pub fn set_aspect_ratio(&self, ratio: AspectRatio) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::SetAspectRatio(ratio)))
    }

    /// Let the engine derive the aspect ratio from the source.
    pub fn set_auto_aspect_ratio(&self, auto: bool) -> Result<(), BridgeError> {
        self.send(BridgeInput::Command(Command::SetAutoAspectRatio(auto)))
    }

    /// The last confirmed playback state, as published by the actor.
    ///
    /// This is an observation mirror, not a round trip: a session stuck in
    /// `Opening` is visible here without waiting on the notification stream.
    pub fn playback_state(&self) -> PlaybackState {
        self.observed.read().clone()
    }

    /// Stop the actor.
    pub fn shutdown(&self) -> Result<(), BridgeError> {
        self.send(BridgeInput::Shutdown)
    }

    fn send(&self, input: BridgeInput) -> Result<(), BridgeError> {
        self.input_tx
            .send(input)
            .map_err(|_| BridgeError::Disconnected)
    }
}
