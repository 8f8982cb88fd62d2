//! Raw engine events and the generation-stamping sink.

use crossbeam_channel::Sender;
use tracing::warn;

use playerbridge_ipc::{Track, VideoSize};

/// Media facts the engine reports once it has parsed a source.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    /// Media duration in milliseconds.
    pub duration_ms: u64,

    /// Decoded video dimensions.
    pub video_size: VideoSize,

    /// Selectable audio tracks.
    pub audio_tracks: Vec<Track>,

    /// Selectable text tracks.
    pub text_tracks: Vec<Track>,

    /// Whether the source supports seeking.
    pub seekable: bool,
}

/// One engine callback, mapped onto the bridge's closed event set.
///
/// Engines confirm state changes exclusively through these; a call on
/// [`MediaEngine`](crate::MediaEngine) returning says nothing about success.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEngineEvent {
    /// The engine began opening the source.
    Opening,

    /// Source parsed; metadata available.
    MetadataReady(MediaMetadata),

    /// Playback started or resumed.
    Playing,

    /// Playback paused.
    Paused,

    /// Playback stopped.
    Stopped,

    /// The playhead moved.
    TimeChanged { time_ms: u64, position: f64 },

    /// A requested seek completed.
    SeekDone { time_ms: u64 },

    /// Playback stalled on input.
    BufferingStarted { speed: f32 },

    /// Input caught up; playback resumes its prior transport state.
    BufferingEnded,

    /// End of media reached.
    EndReached,

    /// The engine failed.
    Error { code: i32, message: String },

    /// The host surface toggled fullscreen.
    FullScreenChanged,
}

/// A raw event stamped with the generation of the session that produced it.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Generation of the engine instance that raised the event.
    pub generation: u64,

    /// The event itself.
    pub event: RawEngineEvent,
}

/// Event sender handed to each engine instance.
///
/// Every sink is pinned to the generation it was created for; events sent
/// after the session is torn down still carry the old generation and are
/// discarded by the bridge.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: Sender<SessionEvent>,
}

impl EventSink {
    /// Creates a sink pinned to `generation`.
    pub fn new(generation: u64, tx: Sender<SessionEvent>) -> Self {
        Self { generation, tx }
    }

    /// The generation this sink stamps onto events.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report one raw engine event.
    pub fn emit(&self, event: RawEngineEvent) {
        let tagged = SessionEvent {
            generation: self.generation,
            event,
        };
        if self.tx.send(tagged).is_err() {
            warn!(generation = self.generation, "raw event dropped: bridge is gone");
        }
    }
}
