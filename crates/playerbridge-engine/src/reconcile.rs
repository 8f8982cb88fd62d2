//! Declarative desired-state reconciliation.
//!
//! Turns consecutive [`DesiredState`] snapshots into the minimal set of
//! commands needed to close the gap. Unchanged fields emit nothing, so a
//! resubmitted identical snapshot is a no-op.

use playerbridge_ipc::{Command, DesiredState, MediaSource, SeekTarget};

/// True when `next` binds a different media source than `prev`.
pub fn source_changed(prev: Option<&MediaSource>, next: Option<&MediaSource>) -> bool {
    match (prev, next) {
        (None, None) => false,
        (Some(prev), Some(next)) => prev != next,
        _ => true,
    }
}

/// Commands for the fields that changed between `prev` and `next`.
///
/// `start_time` never appears here: it is honored once per session, at open,
/// and never re-applied on later snapshots even if the value is resubmitted.
/// `repeat`, `play_in_background`, and `resize_mode` are host-side policy
/// with no engine-facing command.
pub fn diff(prev: &DesiredState, next: &DesiredState) -> Vec<Command> {
    let mut intents = Vec::new();

    if next.paused != prev.paused {
        if let Some(paused) = next.paused {
            intents.push(if paused { Command::Pause } else { Command::Play });
        }
    }
    if next.rate != prev.rate {
        if let Some(rate) = next.rate {
            intents.push(Command::SetRate(rate));
        }
    }
    if next.seek != prev.seek {
        if let Some(fraction) = next.seek {
            intents.push(Command::Seek(SeekTarget::Fraction(fraction)));
        }
    }
    if next.seek_time != prev.seek_time {
        if let Some(ms) = next.seek_time {
            intents.push(Command::Seek(SeekTarget::Time(ms)));
        }
    }
    if next.volume != prev.volume {
        if let Some(volume) = next.volume {
            intents.push(Command::SetVolume(volume));
        }
    }
    if next.muted != prev.muted {
        if let Some(muted) = next.muted {
            intents.push(Command::SetMuted(muted));
        }
    }
    if next.audio_track != prev.audio_track {
        if let Some(id) = next.audio_track {
            intents.push(Command::SetAudioTrack(id));
        }
    }
    if next.text_track != prev.text_track {
        if let Some(id) = next.text_track {
            intents.push(Command::SetTextTrack(id));
        }
    }
    if next.video_aspect_ratio != prev.video_aspect_ratio {
        if let Some(ratio) = next.video_aspect_ratio {
            intents.push(Command::SetAspectRatio(ratio));
        }
    }
    if next.auto_aspect_ratio != prev.auto_aspect_ratio {
        intents.push(Command::SetAutoAspectRatio(next.auto_aspect_ratio));
    }

    intents
}

/// Initial command set for a freshly opened session, derived from the full
/// snapshot rather than a diff.
///
/// The start-time seek goes first and the transport command last, so the
/// FIFO queue hands the seek to the engine before playback starts.
pub fn seed(desired: &DesiredState) -> Vec<Command> {
    let mut intents = Vec::new();

    if let Some(ms) = desired.start_time.filter(|&ms| ms > 0) {
        intents.push(Command::SetStartTime(ms));
    }
    if let Some(rate) = desired.rate {
        intents.push(Command::SetRate(rate));
    }
    if let Some(volume) = desired.volume {
        intents.push(Command::SetVolume(volume));
    }
    if let Some(muted) = desired.muted {
        intents.push(Command::SetMuted(muted));
    }
    if let Some(id) = desired.audio_track {
        intents.push(Command::SetAudioTrack(id));
    }
    if let Some(id) = desired.text_track {
        intents.push(Command::SetTextTrack(id));
    }
    if desired.auto_aspect_ratio {
        intents.push(Command::SetAutoAspectRatio(true));
    } else if let Some(ratio) = desired.video_aspect_ratio {
        intents.push(Command::SetAspectRatio(ratio));
    }
    if desired.wants_playback() {
        intents.push(Command::Play);
    }

    intents
}
