//! Authoritative playback state machine.

use tracing::debug;

use playerbridge_ipc::{PlaybackState, VideoInfo};

/// The single source of truth for where a session is.
///
/// Mutated only from confirmed engine events; issuing a command never moves
/// the state. Every transition method is total: an event that makes no
/// sense in the current state leaves it unchanged and returns `false`.
#[derive(Debug, Default)]
pub struct PlaybackMachine {
    state: PlaybackState,
    resumes_paused: bool,
    video_info: Option<VideoInfo>,
}

impl PlaybackMachine {
    /// The current confirmed state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Media facts for the current session, once loaded.
    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.video_info.as_ref()
    }

    /// Drop everything back to `Idle` for a fresh session.
    pub fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.resumes_paused = false;
        self.video_info = None;
    }

    /// A new source was bound.
    pub fn open(&mut self) -> bool {
        match self.state {
            PlaybackState::Idle | PlaybackState::Ended | PlaybackState::Error { .. } => {
                self.set(PlaybackState::Opening);
                true
            }
            _ => self.ignore("open"),
        }
    }

    /// The engine finished parsing the source.
    ///
    /// `info` is kept only the first time; a session's `VideoInfo` never
    /// mutates once set.
    pub fn metadata_ready(&mut self, info: VideoInfo) -> bool {
        if !self.state.is_opening() {
            return self.ignore("metadata_ready");
        }
        if self.video_info.is_none() {
            self.video_info = Some(info);
        }
        self.set(PlaybackState::Ready);
        true
    }

    /// The engine confirmed playback is running.
    pub fn playing_confirmed(&mut self) -> bool {
        match self.state {
            PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Buffering => {
                self.set(PlaybackState::Playing);
                true
            }
            _ => self.ignore("playing_confirmed"),
        }
    }

    /// The engine confirmed a pause.
    pub fn pause_confirmed(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Buffering => {
                self.set(PlaybackState::Paused);
                true
            }
            _ => self.ignore("pause_confirmed"),
        }
    }

    /// Playback stalled on input. Remembers which transport state to fall
    /// back to when input catches up.
    pub fn buffering_started(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                self.resumes_paused = self.state.is_paused();
                self.set(PlaybackState::Buffering);
                true
            }
            _ => self.ignore("buffering_started"),
        }
    }

    /// Input caught up; return to the transport state buffering interrupted.
    pub fn buffering_ended(&mut self) -> bool {
        if !self.state.is_buffering() {
            return self.ignore("buffering_ended");
        }
        let next = if self.resumes_paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };
        self.set(next);
        true
    }

    /// The media played to its end.
    pub fn end_reached(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Buffering => {
                self.set(PlaybackState::Ended);
                true
            }
            _ => self.ignore("end_reached"),
        }
    }

    /// The engine failed. Terminal until a new source is bound; repeated
    /// failures while already in `Error` report nothing.
    pub fn engine_error(&mut self, code: i32) -> bool {
        if self.state.is_error() {
            return self.ignore("engine_error");
        }
        self.set(PlaybackState::Error { code });
        true
    }

    fn set(&mut self, next: PlaybackState) {
        debug!(
            previous = self.state.name(),
            current = next.name(),
            "state transition"
        );
        self.state = next;
    }

    fn ignore(&self, event: &str) -> bool {
        debug!(state = self.state.name(), event, "event ignored in this state");
        false
    }
}
