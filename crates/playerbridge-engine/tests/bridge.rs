//! End-to-end tests for the assembled bridge actor, driven against the
//! scriptable mock engine.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use playerbridge_engine::{create_bridge, Bridge, BridgeHandle};
use playerbridge_ipc::{
    AspectRatio, DesiredState, MediaSource, PlaybackState, PlayerNotification, SeekTarget, Track,
    VideoSize,
};
use playerbridge_media::mock::{self, EngineCall, MockConfig, MockProbe};
use playerbridge_media::{MediaMetadata, RawEngineEvent};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Rig {
    bridge: Bridge,
    handle: BridgeHandle,
    notify_rx: Receiver<PlayerNotification>,
    probes: Arc<Mutex<Vec<MockProbe>>>,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    fn with_config(config: MockConfig) -> Self {
        init_tracing();
        let probes = Arc::new(Mutex::new(Vec::new()));
        let (bridge, handle, notify_rx) =
            create_bridge(mock::factory_with(Arc::clone(&probes), config));
        Self {
            bridge,
            handle,
            notify_rx,
            probes,
        }
    }

    fn probe(&self, index: usize) -> MockProbe {
        self.probes.lock()[index].clone()
    }

    fn probe_count(&self) -> usize {
        self.probes.lock().len()
    }

    fn drain(&mut self) -> Vec<PlayerNotification> {
        self.bridge.pump();
        self.notify_rx.try_iter().collect()
    }
}

fn source(uri: &str) -> DesiredState {
    DesiredState {
        source: Some(MediaSource::new(uri)),
        ..Default::default()
    }
}

fn metadata(duration_ms: u64) -> MediaMetadata {
    MediaMetadata {
        duration_ms,
        video_size: VideoSize {
            width: 1920,
            height: 1080,
        },
        audio_tracks: vec![Track {
            id: 1,
            is_default: true,
        }],
        text_tracks: vec![],
        seekable: true,
    }
}

fn is_transport(call: &EngineCall) -> bool {
    matches!(call, EngineCall::Play | EngineCall::Pause | EngineCall::Seek(_))
}

#[test]
fn test_start_time_seek_released_and_confirmed_before_first_play() {
    let mut rig = Rig::new();
    let desired = DesiredState {
        start_time: Some(5_000),
        ..source("file:///a.mp4")
    };
    rig.handle.update(desired).unwrap();

    let notes = rig.drain();
    assert!(matches!(notes[0], PlayerNotification::LoadStart { .. }));
    let probe = rig.probe(0);
    // Nothing transport-shaped may reach the engine before metadata.
    assert_eq!(probe.count(is_transport), 0);

    probe.sink.emit(RawEngineEvent::Opening);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    let notes = rig.drain();
    assert!(matches!(notes[0], PlayerNotification::Open { .. }));
    assert!(
        matches!(&notes[1], PlayerNotification::Load(info) if info.duration == 60_000),
        "expected onLoad after onOpen, got {notes:?}"
    );
    assert_eq!(
        notes
            .iter()
            .filter(|n| matches!(n, PlayerNotification::Load(_)))
            .count(),
        1
    );

    let calls = probe.calls();
    let seek_at = calls
        .iter()
        .position(|call| *call == EngineCall::Seek(SeekTarget::Time(5_000)))
        .expect("start-time seek released");
    let play_at = calls
        .iter()
        .position(|call| *call == EngineCall::Play)
        .expect("autoplay released");
    assert!(seek_at < play_at, "seek must precede play: {calls:?}");

    probe.sink.emit(RawEngineEvent::SeekDone { time_ms: 5_000 });
    probe.sink.emit(RawEngineEvent::Playing);
    probe.sink.emit(RawEngineEvent::TimeChanged {
        time_ms: 5_100,
        position: 0.085,
    });
    let notes = rig.drain();
    assert_eq!(
        notes[0],
        PlayerNotification::Playing {
            duration: 60_000,
            target: 5_000,
            seekable: true,
        }
    );
    match &notes[1] {
        PlayerNotification::Progress(sample) => {
            assert!(sample.start_time_set_successfully);
            assert_eq!(sample.remaining_time, 54_900);
        }
        other => panic!("expected progress, got {other:?}"),
    }
}

#[test]
fn test_seeks_before_ready_collapse_to_the_last() {
    let mut rig = Rig::new();
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///a.mp4")
        })
        .unwrap();
    rig.handle.seek(0.2).unwrap();
    rig.handle.seek(0.9).unwrap();
    rig.drain();

    let probe = rig.probe(0);
    assert_eq!(probe.count(|call| matches!(call, EngineCall::Seek(_))), 0);

    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    rig.drain();

    let seeks: Vec<_> = probe
        .calls()
        .into_iter()
        .filter(|call| matches!(call, EngineCall::Seek(_)))
        .collect();
    assert_eq!(seeks, vec![EngineCall::Seek(SeekTarget::Fraction(0.9))]);
}

#[test]
fn test_identical_snapshot_resubmission_is_a_noop() {
    let mut rig = Rig::new();
    let desired = DesiredState {
        paused: Some(true),
        volume: Some(0.5),
        ..source("file:///a.mp4")
    };
    rig.handle.update(desired.clone()).unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    rig.drain();
    let calls_before = probe.calls().len();

    rig.handle.update(desired.clone()).unwrap();
    let notes = rig.drain();
    assert!(notes.is_empty());
    assert_eq!(probe.calls().len(), calls_before);

    // A single changed field produces exactly one engine call.
    rig.handle
        .update(DesiredState {
            volume: Some(0.8),
            ..desired
        })
        .unwrap();
    rig.drain();
    assert_eq!(probe.calls().len(), calls_before + 1);
    assert_eq!(probe.calls().last(), Some(&EngineCall::SetVolume(0.8)));
}

#[test]
fn test_source_swap_discards_pending_commands_and_stale_events() {
    let mut rig = Rig::new();
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///a.mp4")
        })
        .unwrap();
    rig.handle.seek(0.5).unwrap();
    rig.drain();

    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///b.mp4")
        })
        .unwrap();
    rig.drain();
    assert_eq!(rig.probe_count(), 2);
    let old = rig.probe(0);
    let new = rig.probe(1);
    assert_eq!(old.calls().last(), Some(&EngineCall::Stop));

    // A late event from the torn-down engine must not touch the new session.
    old.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    let notes = rig.drain();
    assert!(notes.is_empty(), "stale event leaked: {notes:?}");
    assert_eq!(rig.handle.playback_state(), PlaybackState::Opening);

    // The new session reaches Ready without inheriting the old seek.
    new.sink.emit(RawEngineEvent::MetadataReady(metadata(30_000)));
    let notes = rig.drain();
    assert!(matches!(&notes[0], PlayerNotification::Load(info) if info.duration == 30_000));
    assert_eq!(new.count(|call| matches!(call, EngineCall::Seek(_))), 0);
}

#[test]
fn test_snapshot_before_decoded_frame_fails_without_engine_call() {
    let mut rig = Rig::new();
    rig.handle.update(source("file:///a.mp4")).unwrap();
    rig.drain();

    rig.handle.snapshot("/tmp/x.png").unwrap();
    let notes = rig.drain();
    match &notes[0] {
        PlayerNotification::SnapshotFailed { path, .. } => {
            assert_eq!(path.to_str(), Some("/tmp/x.png"));
        }
        other => panic!("expected snapshot failure, got {other:?}"),
    }
    assert_eq!(
        rig.probe(0).count(|call| matches!(call, EngineCall::Snapshot(_))),
        0
    );
}

#[test]
fn test_snapshot_engine_failure_is_surfaced() {
    let mut rig = Rig::with_config(MockConfig {
        fail_snapshot: Some("no decoded frame".to_string()),
        ..Default::default()
    });
    rig.handle.update(source("file:///a.mp4")).unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    probe.sink.emit(RawEngineEvent::Playing);
    rig.drain();

    rig.handle.snapshot("/tmp/y.png").unwrap();
    let notes = rig.drain();
    match &notes[0] {
        PlayerNotification::SnapshotFailed { message, .. } => {
            assert!(message.contains("no decoded frame"), "got {message}");
        }
        other => panic!("expected snapshot failure, got {other:?}"),
    }
}

#[test]
fn test_paused_toggle_batch_releases_one_transport_command() {
    let mut rig = Rig::new();
    let base = DesiredState {
        paused: Some(false),
        ..source("file:///a.mp4")
    };
    rig.handle.update(base.clone()).unwrap();
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..base.clone()
        })
        .unwrap();
    rig.handle.update(base).unwrap();
    rig.drain();

    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    rig.drain();

    let transport: Vec<_> = probe
        .calls()
        .into_iter()
        .filter(|call| matches!(call, EngineCall::Play | EngineCall::Pause))
        .collect();
    // Redundant against the confirmed state is fine; more than one is not.
    assert_eq!(transport, vec![EngineCall::Play]);
}

#[test]
fn test_engine_error_flushes_queue_and_reports_once() {
    let mut rig = Rig::new();
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///a.mp4")
        })
        .unwrap();
    rig.handle.seek(0.4).unwrap();
    rig.drain();

    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::Error {
        code: 266,
        message: "demux failed".to_string(),
    });
    let notes = rig.drain();
    assert_eq!(
        notes
            .iter()
            .filter(|n| matches!(n, PlayerNotification::Error { .. }))
            .count(),
        1
    );
    assert_eq!(rig.handle.playback_state(), PlaybackState::Error { code: 266 });

    // Repeated failure reports nothing new.
    probe.sink.emit(RawEngineEvent::Error {
        code: 266,
        message: "demux failed".to_string(),
    });
    assert!(rig.drain().is_empty());

    // The bridge accepts a new source immediately; nothing pending leaks in.
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///b.mp4")
        })
        .unwrap();
    rig.drain();
    let recovered = rig.probe(1);
    recovered
        .sink
        .emit(RawEngineEvent::MetadataReady(metadata(30_000)));
    rig.drain();
    assert_eq!(rig.handle.playback_state(), PlaybackState::Ready);
    assert_eq!(recovered.count(|call| matches!(call, EngineCall::Seek(_))), 0);
}

#[test]
fn test_open_rejection_reports_error_and_leaves_bridge_alive() {
    let mut rig = Rig::with_config(MockConfig {
        reject_open: Some("unsupported container".to_string()),
        ..Default::default()
    });
    rig.handle.update(source("file:///bad.bin")).unwrap();
    let notes = rig.drain();
    match &notes[0] {
        PlayerNotification::Error { code, message, .. } => {
            assert_eq!(*code, -1);
            assert!(message.contains("unsupported container"));
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert!(rig.handle.playback_state().is_error());

    // Still serving input afterwards.
    rig.handle.update(source("file:///other.bin")).unwrap();
    let notes = rig.drain();
    assert!(matches!(notes[0], PlayerNotification::Error { .. }));
}

#[test]
fn test_repeat_rebinds_the_source_after_end() {
    let mut rig = Rig::new();
    rig.handle
        .update(DesiredState {
            repeat: true,
            ..source("file:///a.mp4")
        })
        .unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(10_000)));
    probe.sink.emit(RawEngineEvent::Playing);
    rig.drain();

    probe.sink.emit(RawEngineEvent::EndReached);
    let notes = rig.drain();
    assert!(matches!(notes[0], PlayerNotification::Ended { .. }));
    assert!(
        notes
            .iter()
            .any(|n| matches!(n, PlayerNotification::LoadStart { .. })),
        "expected a fresh session after end: {notes:?}"
    );
    assert_eq!(rig.probe_count(), 2);
    assert_eq!(probe.calls().last(), Some(&EngineCall::Stop));
    assert_eq!(rig.handle.playback_state(), PlaybackState::Opening);
}

#[test]
fn test_buffering_and_fullscreen_notifications() {
    let mut rig = Rig::new();
    rig.handle.update(source("file:///a.mp4")).unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    probe.sink.emit(RawEngineEvent::Playing);
    rig.drain();

    probe.sink.emit(RawEngineEvent::BufferingStarted { speed: 800.0 });
    probe.sink.emit(RawEngineEvent::FullScreenChanged);
    probe.sink.emit(RawEngineEvent::BufferingEnded);
    let notes = rig.drain();
    assert!(matches!(notes[0], PlayerNotification::Buffering { .. }));
    assert!(matches!(notes[1], PlayerNotification::FullScreenChange { .. }));
    assert!(matches!(notes[2], PlayerNotification::Playing { .. }));
}

#[test]
fn test_subtitle_change_reattaches_mid_session() {
    let mut rig = Rig::new();
    let desired = DesiredState {
        paused: Some(true),
        ..source("file:///a.mp4")
    };
    rig.handle.update(desired.clone()).unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    rig.drain();

    rig.handle
        .update(DesiredState {
            subtitle_uri: Some("file:///subs.srt".to_string()),
            ..desired
        })
        .unwrap();
    rig.drain();
    assert_eq!(
        probe.count(|call| *call == EngineCall::AddSubtitle("file:///subs.srt".to_string())),
        1
    );
    // Same engine instance: a subtitle change alone is not a new session.
    assert_eq!(rig.probe_count(), 1);
}

#[test]
fn test_imperative_surface_maps_onto_engine_calls() {
    let mut rig = Rig::new();
    rig.handle
        .update(DesiredState {
            paused: Some(true),
            ..source("file:///a.mp4")
        })
        .unwrap();
    rig.drain();
    let probe = rig.probe(0);
    probe.sink.emit(RawEngineEvent::MetadataReady(metadata(60_000)));
    rig.drain();

    rig.handle.resume(true).unwrap();
    rig.handle.set_start_time(2_000).unwrap();
    rig.handle.seek_time(9_000).unwrap();
    rig.handle.set_aspect_ratio(AspectRatio::Ratio4x3).unwrap();
    rig.handle.set_auto_aspect_ratio(true).unwrap();
    rig.drain();

    assert_eq!(
        &probe.calls()[1..],
        &[
            EngineCall::Play,
            EngineCall::Seek(SeekTarget::Time(2_000)),
            EngineCall::Seek(SeekTarget::Time(9_000)),
            EngineCall::SetAspectRatio(Some(AspectRatio::Ratio4x3)),
            EngineCall::SetAspectRatio(None),
        ]
    );
}

#[test]
fn test_run_loop_serves_a_thread_until_shutdown() {
    let rig = Rig::new();
    let Rig {
        mut bridge,
        handle,
        notify_rx,
        probes: _probes,
    } = rig;

    let worker = thread::spawn(move || bridge.run());

    handle.update(source("file:///a.mp4")).unwrap();
    let note = notify_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("bridge thread dispatches");
    assert!(matches!(note, PlayerNotification::LoadStart { .. }));

    handle.shutdown().unwrap();
    worker.join().unwrap();
    assert!(handle.playback_state().is_idle());
    assert!(handle.update(source("file:///b.mp4")).is_err());
}
