//! Sample-channel lifecycle and SFX request handling.
//!
//! These tests drive the public SFX surface against a call-recording engine
//! double: load idempotence, unloaded-play tolerance, single release, volume
//! scaling, and message routing through the plugin.

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use bevy::prelude::*;
use bevy_bandstage::{
    BandStageError, BandStagePlugin, ChannelHandle, EngineErrorCode, PlaySfx, SampleChannel,
    SampleEngine, SampleHandle, SfxBank, SfxBankConfig, SfxKind, SfxSettings, DEFAULT_POLYPHONY,
};

#[derive(Default, Clone)]
struct EngineLog {
    loads: Vec<(String, u32)>,
    channels_opened: u32,
    volumes: Vec<f32>,
    plays: u32,
    frees: u32,
}

/// Engine double that records every call.
#[derive(Default)]
struct RecordingEngine {
    log: Mutex<EngineLog>,
    fail_loads: bool,
    next_handle: AtomicU32,
}

impl RecordingEngine {
    fn failing() -> Self {
        Self {
            fail_loads: true,
            ..Default::default()
        }
    }

    fn snapshot(&self) -> EngineLog {
        self.log.lock().unwrap().clone()
    }
}

impl SampleEngine for RecordingEngine {
    fn load_sample(&self, path: &str, polyphony: u32) -> SampleHandle {
        self.log
            .lock()
            .unwrap()
            .loads
            .push((path.to_owned(), polyphony));
        if self.fail_loads {
            return SampleHandle::NULL;
        }
        SampleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn sample_channel(&self, sample: SampleHandle) -> ChannelHandle {
        if sample.is_null() {
            return ChannelHandle::NULL;
        }
        let mut log = self.log.lock().unwrap();
        log.channels_opened += 1;
        ChannelHandle(log.channels_opened)
    }

    fn set_channel_volume(&self, _channel: ChannelHandle, volume: f32) {
        self.log.lock().unwrap().volumes.push(volume);
    }

    fn play_channel(&self, _channel: ChannelHandle) {
        self.log.lock().unwrap().plays += 1;
    }

    fn free_sample(&self, _sample: SampleHandle) {
        self.log.lock().unwrap().frees += 1;
    }

    fn last_error(&self) -> EngineErrorCode {
        if self.fail_loads {
            EngineErrorCode::FILE_OPEN
        } else {
            EngineErrorCode::OK
        }
    }
}

#[test]
fn load_is_idempotent() {
    let engine = Arc::new(RecordingEngine::default());
    let mut channel = SampleChannel::new(engine.clone(), "sfx/confirm.ogg", 2, SfxKind::MenuConfirm);

    assert!(channel.load().is_ok());
    assert!(channel.load().is_ok());

    let log = engine.snapshot();
    assert_eq!(
        log.loads,
        vec![("sfx/confirm.ogg".to_owned(), 2)],
        "second load must not reach the engine"
    );
    assert!(channel.is_loaded());
}

#[test]
fn failed_load_surfaces_engine_code_and_allows_retry() {
    let engine = Arc::new(RecordingEngine::failing());
    let mut channel = SampleChannel::new(engine.clone(), "sfx/missing.ogg", 1, SfxKind::NoteMiss);

    let err = channel.load().unwrap_err();
    match err {
        BandStageError::SampleLoad { path, code } => {
            assert_eq!(path, "sfx/missing.ogg");
            assert_eq!(code, EngineErrorCode::FILE_OPEN);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!channel.is_loaded());

    // Retry is safe and reaches the engine again.
    assert!(channel.load().is_err());
    assert_eq!(engine.snapshot().loads.len(), 2);
}

#[test]
fn play_before_load_is_a_silent_noop() {
    let engine = Arc::new(RecordingEngine::default());
    let channel = SampleChannel::new(engine.clone(), "sfx/back.ogg", 1, SfxKind::MenuBack);

    channel.play(1.0);

    let log = engine.snapshot();
    assert_eq!(log.channels_opened, 0);
    assert_eq!(log.plays, 0);
    assert!(log.volumes.is_empty());
}

#[test]
fn play_applies_master_and_category_volume() {
    let engine = Arc::new(RecordingEngine::default());
    let mut channel = SampleChannel::new(engine.clone(), "sfx/miss.ogg", 4, SfxKind::NoteMiss);
    channel.load().unwrap();

    channel.play(0.5);

    let log = engine.snapshot();
    assert_eq!(log.plays, 1);
    assert_eq!(log.volumes.len(), 1);
    assert_relative_eq!(log.volumes[0], 0.5 * SfxKind::NoteMiss.volume_scale());
}

#[test]
fn overlapping_plays_spawn_fresh_channels() {
    let engine = Arc::new(RecordingEngine::default());
    let mut channel = SampleChannel::new(engine.clone(), "sfx/miss.ogg", 4, SfxKind::NoteMiss);
    channel.load().unwrap();

    channel.play(1.0);
    channel.play(1.0);
    channel.play(1.0);

    let log = engine.snapshot();
    assert_eq!(log.channels_opened, 3);
    assert_eq!(log.plays, 3);
}

#[test]
fn release_happens_exactly_once() {
    let engine = Arc::new(RecordingEngine::default());
    let mut channel = SampleChannel::new(engine.clone(), "sfx/star.ogg", 1, SfxKind::StarGain);
    channel.load().unwrap();

    channel.unload();
    channel.unload();
    channel.unload();
    drop(channel);

    assert_eq!(engine.snapshot().frees, 1);
}

#[test]
fn drop_releases_a_loaded_channel() {
    let engine = Arc::new(RecordingEngine::default());
    {
        let mut channel = SampleChannel::new(engine.clone(), "sfx/star.ogg", 1, SfxKind::StarGain);
        channel.load().unwrap();
    }
    assert_eq!(engine.snapshot().frees, 1);
}

#[test]
fn dropping_an_unloaded_channel_touches_nothing() {
    let engine = Arc::new(RecordingEngine::default());
    {
        let _channel = SampleChannel::new(engine.clone(), "sfx/star.ogg", 1, SfxKind::StarGain);
    }
    assert_eq!(engine.snapshot().frees, 0);
}

#[test]
fn plugin_routes_play_requests_through_the_bank() {
    let engine = Arc::new(RecordingEngine::default());

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, BandStagePlugin::default()));

    let mut bank = SfxBank::new(engine.clone());
    bank.register(SfxKind::NoteMiss, "sfx/miss.ogg", DEFAULT_POLYPHONY);
    app.insert_resource(bank);
    app.insert_resource(SfxSettings { sfx_volume: 0.8 });

    // First update runs the startup load pass.
    app.update();
    assert_eq!(engine.snapshot().loads.len(), 1);

    app.world_mut()
        .resource_mut::<Messages<PlaySfx>>()
        .write(PlaySfx(SfxKind::NoteMiss));
    app.update();

    let log = engine.snapshot();
    assert_eq!(log.plays, 1);
    assert_relative_eq!(log.volumes[0], 0.8 * SfxKind::NoteMiss.volume_scale());
}

#[test]
fn requests_without_a_bank_are_discarded() {
    let engine = Arc::new(RecordingEngine::default());

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, BandStagePlugin::default()));

    app.world_mut()
        .resource_mut::<Messages<PlaySfx>>()
        .write(PlaySfx(SfxKind::MenuConfirm));
    app.update();

    // Bank arrives afterwards; the stale request must not fire.
    let mut bank = SfxBank::new(engine.clone());
    bank.register(SfxKind::MenuConfirm, "sfx/confirm.ogg", 1);
    bank.load(SfxKind::MenuConfirm).unwrap();
    app.insert_resource(bank);
    app.update();

    assert_eq!(engine.snapshot().plays, 0);
}

#[test]
fn unknown_kind_requests_are_ignored() {
    let engine = Arc::new(RecordingEngine::default());
    let bank = SfxBank::new(engine.clone());

    bank.play(SfxKind::StarPowerAward, 1.0);

    assert_eq!(engine.snapshot().plays, 0);
}

#[test]
fn bank_builds_from_ron_manifest() {
    let manifest = r#"(
        samples: [
            (kind: note_miss, path: "sfx/miss.ogg", polyphony: 2),
            (kind: menu_confirm, path: "sfx/confirm.ogg"),
        ],
    )"#;
    let config = SfxBankConfig::from_ron_str(manifest).unwrap();

    let engine = Arc::new(RecordingEngine::default());
    let mut bank = SfxBank::from_config(engine.clone(), &config);
    assert_eq!(bank.len(), 2);

    let failures = bank.load_all();
    assert!(failures.is_empty());
    assert!(bank.channel(SfxKind::NoteMiss).unwrap().is_loaded());

    let mut loads = engine.snapshot().loads;
    loads.sort();
    assert_eq!(
        loads,
        vec![
            ("sfx/confirm.ogg".to_owned(), DEFAULT_POLYPHONY),
            ("sfx/miss.ogg".to_owned(), 2),
        ]
    );
}

#[test]
fn bank_collects_load_failures_per_kind() {
    let engine = Arc::new(RecordingEngine::failing());
    let mut bank = SfxBank::new(engine);
    bank.register(SfxKind::NoteMiss, "sfx/miss.ogg", 1);
    bank.register(SfxKind::StarGain, "sfx/star.ogg", 1);

    let mut failures = bank.load_all();
    failures.sort_by_key(|(kind, _)| format!("{kind:?}"));
    assert_eq!(failures.len(), 2);
    assert!(failures
        .iter()
        .all(|(_, err)| matches!(err, BandStageError::SampleLoad { .. })));
}

#[test]
fn manifest_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"(samples: [(kind: overstrum, path: "sfx/overstrum.ogg")])"#
    )
    .unwrap();

    let config = SfxBankConfig::from_path(file.path()).unwrap();
    assert_eq!(config.samples.len(), 1);
    assert_eq!(config.samples[0].kind, SfxKind::Overstrum);

    let missing = SfxBankConfig::from_path("/nonexistent/bank.ron");
    assert!(matches!(
        missing.unwrap_err(),
        BandStageError::ManifestRead { .. }
    ));
}
