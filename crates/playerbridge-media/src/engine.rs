//! The imperative surface an external playback engine must provide.

use std::path::Path;

use url::Url;

use playerbridge_ipc::{AspectRatio, SeekTarget, TrackKind};

use crate::error::EngineError;
use crate::events::EventSink;

/// One playback engine instance, bound to a single source.
///
/// Every method is a one-way request: the call returning means the request
/// was accepted, not that it took effect. Confirmations arrive as raw events
/// through the [`EventSink`] the instance was constructed with. Engines are
/// expected to treat `play`/`pause`/`stop` as idempotent and to ignore a
/// `seek` issued before metadata is loaded (reporting nothing rather than
/// failing).
pub trait MediaEngine: Send {
    /// Bind and start parsing the source. `options` carries the engine
    /// startup flags the session was configured with.
    fn open(&mut self, uri: &Url, options: &[String]) -> Result<(), EngineError>;

    /// Start or resume playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Stop playback and release the source.
    fn stop(&mut self);

    /// Move the playhead.
    fn seek(&mut self, target: SeekTarget);

    /// Select an elementary stream.
    fn set_track(&mut self, kind: TrackKind, id: i32);

    /// Set the playback rate multiplier.
    fn set_rate(&mut self, rate: f32);

    /// Set the output volume, 0.0 - 1.0.
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute output.
    fn set_muted(&mut self, muted: bool);

    /// Force a display aspect ratio; `None` lets the engine derive it from
    /// the source.
    fn set_aspect_ratio(&mut self, ratio: Option<AspectRatio>);

    /// Side-load a subtitle file.
    fn add_subtitle(&mut self, uri: &Url);

    /// Capture the current frame to `path`. The one call that reports
    /// failure synchronously: there is no event to wait for when no decoded
    /// frame exists.
    fn snapshot(&mut self, path: &Path) -> Result<(), EngineError>;
}

/// Constructor invoked once per session to produce a fresh engine instance.
///
/// The sink passed in is pinned to the new session's generation; the
/// instance must report all of its events through it.
pub type EngineFactory =
    Box<dyn FnMut(EventSink) -> Result<Box<dyn MediaEngine>, EngineError> + Send>;
