//! Scriptable in-memory engine for tests.
//!
//! A [`MockEngine`] records every call it receives and never acts on its
//! own; tests drive confirmations by emitting raw events through the probe's
//! sink, exactly the way a real engine callback thread would.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use playerbridge_ipc::{AspectRatio, SeekTarget, TrackKind};

use crate::engine::{EngineFactory, MediaEngine};
use crate::error::EngineError;
use crate::events::EventSink;

/// A call recorded by [`MockEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Open(String, Vec<String>),
    Play,
    Pause,
    Stop,
    Seek(SeekTarget),
    SetTrack(TrackKind, i32),
    SetRate(f32),
    SetVolume(f32),
    SetMuted(bool),
    SetAspectRatio(Option<AspectRatio>),
    AddSubtitle(String),
    Snapshot(PathBuf),
}

/// Observer handle for one mock engine instance.
#[derive(Clone)]
pub struct MockProbe {
    /// Generation-pinned sink; emit raw events here to play the engine side.
    pub sink: EventSink,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockProbe {
    /// Every call the instance has received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// How many recorded calls match `predicate`.
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }
}

/// Behavior knobs for mock instances produced by [`factory_with`].
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Reject `open` with this message.
    pub reject_open: Option<String>,

    /// Fail `snapshot` with this message.
    pub fail_snapshot: Option<String>,
}

/// Call-recording engine with no behavior of its own.
pub struct MockEngine {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    config: MockConfig,
}

impl MockEngine {
    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }
}

impl MediaEngine for MockEngine {
    fn open(&mut self, uri: &Url, options: &[String]) -> Result<(), EngineError> {
        if let Some(message) = &self.config.reject_open {
            return Err(EngineError::OpenRejected {
                uri: uri.to_string(),
                message: message.clone(),
            });
        }
        self.record(EngineCall::Open(uri.to_string(), options.to_vec()));
        Ok(())
    }

    fn play(&mut self) {
        self.record(EngineCall::Play);
    }

    fn pause(&mut self) {
        self.record(EngineCall::Pause);
    }

    fn stop(&mut self) {
        self.record(EngineCall::Stop);
    }

    fn seek(&mut self, target: SeekTarget) {
        self.record(EngineCall::Seek(target));
    }

    fn set_track(&mut self, kind: TrackKind, id: i32) {
        self.record(EngineCall::SetTrack(kind, id));
    }

    fn set_rate(&mut self, rate: f32) {
        self.record(EngineCall::SetRate(rate));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(EngineCall::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(EngineCall::SetMuted(muted));
    }

    fn set_aspect_ratio(&mut self, ratio: Option<AspectRatio>) {
        self.record(EngineCall::SetAspectRatio(ratio));
    }

    fn add_subtitle(&mut self, uri: &Url) {
        self.record(EngineCall::AddSubtitle(uri.to_string()));
    }

    fn snapshot(&mut self, path: &Path) -> Result<(), EngineError> {
        if let Some(message) = &self.config.fail_snapshot {
            return Err(EngineError::Snapshot {
                path: path.to_path_buf(),
                message: message.clone(),
            });
        }
        self.record(EngineCall::Snapshot(path.to_path_buf()));
        Ok(())
    }
}

/// Factory that pushes a [`MockProbe`] into `probes` for every instance it
/// creates.
pub fn factory(probes: Arc<Mutex<Vec<MockProbe>>>) -> EngineFactory {
    factory_with(probes, MockConfig::default())
}

/// Like [`factory`], with per-instance behavior knobs.
pub fn factory_with(probes: Arc<Mutex<Vec<MockProbe>>>, config: MockConfig) -> EngineFactory {
    Box::new(move |sink| {
        let calls = Arc::new(Mutex::new(Vec::new()));
        probes.lock().push(MockProbe {
            sink,
            calls: Arc::clone(&calls),
        });
        Ok(Box::new(MockEngine {
            calls,
            config: config.clone(),
        }))
    })
}
