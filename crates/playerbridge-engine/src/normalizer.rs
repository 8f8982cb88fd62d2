//! Raw engine event normalization and notification synthesis.

use tracing::{debug, trace, warn};

use playerbridge_ipc::{PlayerNotification, ProgressSample, VideoInfo};
use playerbridge_media::{MediaMetadata, RawEngineEvent};

use crate::machine::PlaybackMachine;

/// Tracking for the session's one-shot start-time seek.
#[derive(Debug, Clone, Copy)]
struct StartTimePlan {
    target_ms: u64,
    released: bool,
    confirmed: bool,
}

/// Maps raw engine events onto state machine transitions and synthesized
/// notifications.
///
/// Holds the per-session derived state: the last dispatched progress pair
/// for deduplication, the last confirmed playhead for `target` echoes, and
/// the start-time bookkeeping behind `start_time_set_successfully`.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    last_progress: Option<(u64, f64)>,
    last_time_ms: u64,
    buffering_speed: f32,
    seekable: bool,
    start_time: Option<StartTimePlan>,
    start_time_result: Option<bool>,
    saw_playing: bool,
}

impl EventNormalizer {
    /// Drop all derived state for a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last confirmed playhead in milliseconds; echoed as `target`.
    pub fn target(&self) -> u64 {
        self.last_time_ms
    }

    /// Register the session's one-shot start-time seek.
    pub fn plan_start_time(&mut self, target_ms: u64) {
        self.start_time = Some(StartTimePlan {
            target_ms,
            released: false,
            confirmed: false,
        });
    }

    /// The start-time seek was handed to the engine.
    pub fn start_time_released(&mut self) {
        if let Some(plan) = &mut self.start_time {
            plan.released = true;
        }
    }

    fn start_time_ok(&self) -> bool {
        self.start_time_result.unwrap_or(false)
    }

    /// Consume one confirmed engine event: update the machine, then return
    /// the notifications to dispatch, in order.
    pub fn on_raw(
        &mut self,
        event: RawEngineEvent,
        machine: &mut PlaybackMachine,
    ) -> Vec<PlayerNotification> {
        let mut out = Vec::new();
        match event {
            RawEngineEvent::Opening => {
                out.push(PlayerNotification::Open {
                    target: self.last_time_ms,
                });
            }
            RawEngineEvent::MetadataReady(metadata) => {
                self.seekable = metadata.seekable;
                let info = self.video_info_from(metadata);
                if machine.metadata_ready(info.clone()) {
                    out.push(PlayerNotification::Load(info));
                }
            }
            RawEngineEvent::Playing => {
                if !self.saw_playing {
                    self.saw_playing = true;
                    // Computed exactly once: was the initial seek released
                    // and confirmed before playback first started?
                    let ok = self
                        .start_time
                        .map(|plan| plan.released && plan.confirmed)
                        .unwrap_or(false);
                    self.start_time_result = Some(ok);
                    debug!(start_time_set_successfully = ok, "first playing transition");
                }
                if machine.playing_confirmed() {
                    out.push(self.playing_notification(machine));
                }
            }
            RawEngineEvent::Paused => {
                if machine.pause_confirmed() {
                    out.push(PlayerNotification::Paused {
                        target: self.last_time_ms,
                    });
                }
            }
            RawEngineEvent::Stopped => {
                out.push(PlayerNotification::Stopped {
                    target: self.last_time_ms,
                });
            }
            RawEngineEvent::TimeChanged { time_ms, position } => {
                if self.last_progress == Some((time_ms, position)) {
                    trace!(time_ms, position, "suppressing no-op progress tick");
                } else if let Some(duration) = machine.video_info().map(|info| info.duration) {
                    self.last_progress = Some((time_ms, position));
                    self.last_time_ms = time_ms;
                    out.push(PlayerNotification::Progress(ProgressSample {
                        current_time: time_ms,
                        position,
                        duration,
                        target: time_ms,
                        remaining_time: duration.saturating_sub(time_ms),
                        buffering_speed: self.buffering_speed,
                        start_time_set_successfully: self.start_time_ok(),
                    }));
                } else {
                    trace!(time_ms, "progress tick before metadata, dropped");
                }
            }
            RawEngineEvent::SeekDone { time_ms } => {
                self.last_time_ms = time_ms;
                let first_playing_pending = !self.saw_playing;
                if let Some(plan) = &mut self.start_time {
                    if plan.released
                        && !plan.confirmed
                        && first_playing_pending
                        && time_ms == plan.target_ms
                    {
                        plan.confirmed = true;
                        debug!(time_ms, "start-time seek confirmed");
                    }
                }
            }
            RawEngineEvent::BufferingStarted { speed } => {
                self.buffering_speed = speed;
                if machine.buffering_started() {
                    out.push(PlayerNotification::Buffering {
                        target: self.last_time_ms,
                    });
                }
            }
            RawEngineEvent::BufferingEnded => {
                if machine.buffering_ended() {
                    if machine.state().is_playing() {
                        out.push(self.playing_notification(machine));
                    } else {
                        out.push(PlayerNotification::Paused {
                            target: self.last_time_ms,
                        });
                    }
                }
            }
            RawEngineEvent::EndReached => {
                if machine.end_reached() {
                    out.push(PlayerNotification::Ended {
                        target: self.last_time_ms,
                    });
                }
            }
            RawEngineEvent::Error { code, message } => {
                if machine.engine_error(code) {
                    warn!(code, %message, "engine reported error");
                    out.push(PlayerNotification::Error {
                        target: self.last_time_ms,
                        code,
                        message,
                    });
                }
            }
            RawEngineEvent::FullScreenChanged => {
                out.push(PlayerNotification::FullScreenChange {
                    target: self.last_time_ms,
                });
            }
        }
        out
    }

    fn video_info_from(&self, metadata: MediaMetadata) -> VideoInfo {
        VideoInfo {
            duration: metadata.duration_ms,
            target: self.last_time_ms,
            video_size: metadata.video_size,
            audio_tracks: metadata.audio_tracks,
            text_tracks: metadata.text_tracks,
        }
    }

    fn playing_notification(&self, machine: &PlaybackMachine) -> PlayerNotification {
        PlayerNotification::Playing {
            duration: machine.video_info().map(|info| info.duration).unwrap_or(0),
            target: self.last_time_ms,
            seekable: self.seekable,
        }
    }
}
