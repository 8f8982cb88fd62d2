//! Thin facade over the external media engine.

use crossbeam_channel::Sender;
use tracing::{debug, warn};
use url::Url;

use playerbridge_ipc::{Command, InitType, MediaSource, SeekTarget, TrackKind};

use crate::engine::{EngineFactory, MediaEngine};
use crate::error::EngineError;
use crate::events::{EventSink, SessionEvent};

/// Owns at most one engine instance and translates bridge commands into
/// engine calls.
///
/// The adapter is also where session generations are minted: each
/// `open_session` tears the previous instance down completely, bumps the
/// generation, and hands the new instance a sink pinned to it.
pub struct EngineAdapter {
    factory: EngineFactory,
    raw_tx: Sender<SessionEvent>,
    engine: Option<Box<dyn MediaEngine>>,
    generation: u64,
}

impl EngineAdapter {
    /// Creates an adapter that builds engine instances with `factory` and
    /// routes their events into `raw_tx`.
    pub fn new(factory: EngineFactory, raw_tx: Sender<SessionEvent>) -> Self {
        Self {
            factory,
            raw_tx,
            engine: None,
            generation: 0,
        }
    }

    /// Generation of the most recently opened session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an engine instance is currently bound.
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Tear down the previous engine instance, then construct and open a
    /// fresh one for `source`. Returns the new session generation.
    pub fn open_session(
        &mut self,
        source: &MediaSource,
        subtitle_uri: Option<&str>,
    ) -> Result<u64, EngineError> {
        self.close_session();
        self.generation += 1;

        let uri = Url::parse(&source.uri)?;
        let sink = EventSink::new(self.generation, self.raw_tx.clone());
        let mut engine = (self.factory)(sink)?;

        let options: &[String] = match source.init_type {
            InitType::Simple => &[],
            InitType::WithOptions => &source.init_options,
        };
        engine.open(&uri, options)?;

        if let Some(subtitle) = subtitle_uri {
            match Url::parse(subtitle) {
                Ok(subtitle_url) => engine.add_subtitle(&subtitle_url),
                Err(error) => warn!(uri = subtitle, %error, "ignoring bad subtitle uri"),
            }
        }

        self.engine = Some(engine);
        debug!(generation = self.generation, uri = %source.uri, "engine session opened");
        Ok(self.generation)
    }

    /// Stop and drop the current engine instance, if any.
    pub fn close_session(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
            debug!(generation = self.generation, "engine session closed");
        }
    }

    /// Attach a subtitle file to the running session.
    pub fn set_subtitle(&mut self, uri: &str) -> Result<(), EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::NoSession)?;
        let subtitle_url = Url::parse(uri)?;
        engine.add_subtitle(&subtitle_url);
        Ok(())
    }

    /// Hand one released command to the engine.
    ///
    /// Success here means the request was issued, nothing more; the outcome
    /// arrives later as a raw event. Only `Snapshot` can fail synchronously.
    pub fn apply(&mut self, command: &Command) -> Result<(), EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::NoSession)?;
        match command {
            Command::Play => engine.play(),
            Command::Pause => engine.pause(),
            Command::Seek(target) => engine.seek(*target),
            Command::SetStartTime(ms) => engine.seek(SeekTarget::Time(*ms)),
            Command::SetRate(rate) => engine.set_rate(*rate),
            Command::SetVolume(volume) => engine.set_volume(*volume),
            Command::SetMuted(muted) => engine.set_muted(*muted),
            Command::SetAudioTrack(id) => engine.set_track(TrackKind::Audio, *id),
            Command::SetTextTrack(id) => engine.set_track(TrackKind::Text, *id),
            Command::SetAspectRatio(ratio) => engine.set_aspect_ratio(Some(*ratio)),
            Command::SetAutoAspectRatio(auto) => {
                // Turning auto off keeps the engine's current ratio until an
                // explicit SetAspectRatio arrives.
                if *auto {
                    engine.set_aspect_ratio(None);
                }
            }
            Command::Snapshot(path) => engine.snapshot(path)?,
        }
        Ok(())
    }
}
