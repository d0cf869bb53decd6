//! One-shot sound-effect playback.
//!
//! A [`SampleChannel`] owns a single engine-side sample: it loads the sample
//! lazily (at most once), spawns an overlapping playback instance per
//! [`play`](SampleChannel::play), and releases the engine resource exactly
//! once when unloaded or dropped. The [`SfxBank`] resource keys channels by
//! [`SfxKind`] and answers [`PlaySfx`] requests written by gameplay code.
//!
//! # Firing an effect
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_bandstage::{PlaySfx, SfxKind};
//!
//! fn on_overstrum(mut sfx: MessageWriter<PlaySfx>) {
//!     sfx.write(PlaySfx(SfxKind::Overstrum));
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

use crate::engine::{SampleEngine, SampleHandle};
use crate::error::{BandStageError, Result};
use crate::events::PlaySfx;

/// Default simultaneous playback count for a sample channel.
pub const DEFAULT_POLYPHONY: u32 = 4;

/// Sound-effect category.
///
/// Each kind carries a fixed volume multiplier applied on top of the master
/// SFX volume at play time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfxKind {
    /// Menu cursor movement.
    MenuNavigate,
    /// Menu selection confirmed.
    MenuConfirm,
    /// Menu backed out.
    MenuBack,
    /// A note was missed.
    NoteMiss,
    /// Strum with no matching note.
    Overstrum,
    /// A star threshold was crossed.
    StarGain,
    /// Star power fully charged.
    StarPowerAward,
    /// Star power activated.
    StarPowerRelease,
}

impl SfxKind {
    /// All categories, in declaration order.
    pub const ALL: [SfxKind; 8] = [
        SfxKind::MenuNavigate,
        SfxKind::MenuConfirm,
        SfxKind::MenuBack,
        SfxKind::NoteMiss,
        SfxKind::Overstrum,
        SfxKind::StarGain,
        SfxKind::StarPowerAward,
        SfxKind::StarPowerRelease,
    ];

    /// Fixed per-category volume multiplier.
    pub fn volume_scale(self) -> f32 {
        match self {
            SfxKind::MenuNavigate => 1.0,
            SfxKind::MenuConfirm => 1.0,
            SfxKind::MenuBack => 1.0,
            SfxKind::NoteMiss => 0.55,
            SfxKind::Overstrum => 0.4,
            SfxKind::StarGain => 0.6,
            SfxKind::StarPowerAward => 0.45,
            SfxKind::StarPowerRelease => 0.5,
        }
    }
}

/// Owns one engine-side sample and mediates its playback.
///
/// The channel starts unloaded. [`load`](Self::load) acquires the engine
/// handle at most once; [`play`](Self::play) spawns a fresh playback
/// instance (a no-op while unloaded); [`unload`](Self::unload) releases the
/// handle exactly once and also runs on drop.
pub struct SampleChannel {
    engine: Arc<dyn SampleEngine>,
    path: String,
    polyphony: u32,
    kind: SfxKind,
    handle: Option<SampleHandle>,
}

impl SampleChannel {
    /// Create an unloaded channel for the sample at `path`.
    pub fn new(
        engine: Arc<dyn SampleEngine>,
        path: impl Into<String>,
        polyphony: u32,
        kind: SfxKind,
    ) -> Self {
        Self {
            engine,
            path: path.into(),
            polyphony,
            kind,
            handle: None,
        }
    }

    /// The category this channel plays.
    pub fn kind(&self) -> SfxKind {
        self.kind
    }

    /// The sample file path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the engine-side sample has been acquired.
    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Ask the engine to load the sample.
    ///
    /// Idempotent: once loaded, further calls succeed without touching the
    /// engine. On failure the channel stays unloaded and the error carries
    /// the engine code; retrying is safe.
    pub fn load(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let handle = self.engine.load_sample(&self.path, self.polyphony);
        if handle.is_null() {
            return Err(BandStageError::sample_load(
                &self.path,
                self.engine.last_error(),
            ));
        }
        self.handle = Some(handle);
        Ok(())
    }

    /// Fire one playback instance at `master_volume * kind volume scale`.
    ///
    /// A no-op while unloaded; engine-level playback failures are not
    /// surfaced (sound is non-critical).
    pub fn play(&self, master_volume: f32) {
        let Some(handle) = self.handle else {
            return;
        };
        let channel = self.engine.sample_channel(handle);
        self.engine
            .set_channel_volume(channel, master_volume * self.kind.volume_scale());
        self.engine.play_channel(channel);
    }

    /// Release the engine-side sample.
    ///
    /// Safe to call more than once; also runs automatically on drop, so the
    /// handle can never leak or be freed twice.
    pub fn unload(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.free_sample(handle);
        }
    }
}

impl Drop for SampleChannel {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Resource for global SFX playback settings.
///
/// The master volume multiplies every category's own scale at play time.
#[derive(Resource)]
pub struct SfxSettings {
    /// Master SFX volume multiplier (0.0 - 1.0). Defaults to 1.0.
    pub sfx_volume: f32,
}

impl Default for SfxSettings {
    fn default() -> Self {
        Self { sfx_volume: 1.0 }
    }
}

/// One manifest entry: which file backs a category and how many overlapping
/// plays it allows.
#[derive(Debug, Clone, Deserialize)]
pub struct SfxSampleDef {
    pub kind: SfxKind,
    pub path: String,
    #[serde(default = "default_polyphony")]
    pub polyphony: u32,
}

fn default_polyphony() -> u32 {
    DEFAULT_POLYPHONY
}

/// Declarative SFX manifest, typically loaded from RON:
///
/// ```ron
/// (
///     samples: [
///         (kind: note_miss, path: "sfx/miss.ogg", polyphony: 2),
///         (kind: star_gain, path: "sfx/star.ogg"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SfxBankConfig {
    pub samples: Vec<SfxSampleDef>,
}

impl SfxBankConfig {
    /// Parse a manifest from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::de::from_str(text).map_err(|e| BandStageError::manifest(e.to_string()))
    }

    /// Read and parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BandStageError::manifest_read(path.display().to_string(), e.to_string())
        })?;
        Self::from_ron_str(&text)
    }
}

/// Resource owning every registered sample channel.
#[derive(Resource)]
pub struct SfxBank {
    engine: Arc<dyn SampleEngine>,
    channels: HashMap<SfxKind, SampleChannel>,
}

impl SfxBank {
    /// Create an empty bank on the given engine.
    pub fn new(engine: Arc<dyn SampleEngine>) -> Self {
        Self {
            engine,
            channels: HashMap::new(),
        }
    }

    /// Create a bank with every channel from a manifest registered
    /// (unloaded; call [`load_all`](Self::load_all) afterwards).
    pub fn from_config(engine: Arc<dyn SampleEngine>, config: &SfxBankConfig) -> Self {
        let mut bank = Self::new(engine);
        for def in &config.samples {
            bank.register(def.kind, def.path.clone(), def.polyphony);
        }
        bank
    }

    /// Register (or replace) the channel backing a category.
    pub fn register(&mut self, kind: SfxKind, path: impl Into<String>, polyphony: u32) {
        let channel = SampleChannel::new(Arc::clone(&self.engine), path, polyphony, kind);
        self.channels.insert(kind, channel);
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels are registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Access the channel registered for a category, if any.
    pub fn channel(&self, kind: SfxKind) -> Option<&SampleChannel> {
        self.channels.get(&kind)
    }

    /// Load the sample for one category.
    pub fn load(&mut self, kind: SfxKind) -> Result<()> {
        match self.channels.get_mut(&kind) {
            Some(channel) => channel.load(),
            None => Err(BandStageError::Other(format!(
                "no sample registered for {kind:?}"
            ))),
        }
    }

    /// Attempt to load every registered sample, collecting failures.
    ///
    /// Failed channels stay unloaded (their playback is silently skipped);
    /// callers typically log each failure and continue.
    pub fn load_all(&mut self) -> Vec<(SfxKind, BandStageError)> {
        let mut failures = Vec::new();
        for (kind, channel) in self.channels.iter_mut() {
            if let Err(err) = channel.load() {
                failures.push((*kind, err));
            }
        }
        failures
    }

    /// Fire one playback of the given category. Unknown categories and
    /// unloaded channels are silent no-ops.
    pub fn play(&self, kind: SfxKind, master_volume: f32) {
        match self.channels.get(&kind) {
            Some(channel) => channel.play(master_volume),
            None => debug!("no sample registered for {:?}", kind),
        }
    }
}

/// Drains [`PlaySfx`] requests into the bank.
///
/// Without a bank resource, pending requests are discarded so they cannot
/// fire retroactively once a bank appears.
pub fn process_sfx_requests(
    mut requests: MessageReader<PlaySfx>,
    bank: Option<Res<SfxBank>>,
    settings: Res<SfxSettings>,
) {
    let Some(bank) = bank else {
        requests.clear();
        return;
    };
    for request in requests.read() {
        bank.play(request.0, settings.sfx_volume);
    }
}

/// Startup pass loading every registered sample, logging failures with
/// their engine codes.
pub fn load_sfx_bank(bank: Option<ResMut<SfxBank>>) {
    let Some(mut bank) = bank else {
        return;
    };
    for (kind, err) in bank.load_all() {
        error!("failed to load {:?} sample: {}", kind, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_scales_are_normalized() {
        for kind in SfxKind::ALL {
            let scale = kind.volume_scale();
            assert!((0.0..=1.0).contains(&scale), "{kind:?} scale {scale}");
        }
    }

    #[test]
    fn manifest_defaults_polyphony() {
        let config = SfxBankConfig::from_ron_str(
            r#"(
                samples: [
                    (kind: note_miss, path: "sfx/miss.ogg", polyphony: 2),
                    (kind: star_gain, path: "sfx/star.ogg"),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(config.samples.len(), 2);
        assert_eq!(config.samples[0].polyphony, 2);
        assert_eq!(config.samples[1].polyphony, DEFAULT_POLYPHONY);
    }

    #[test]
    fn malformed_manifest_is_rejected() {
        let err = SfxBankConfig::from_ron_str("(samples: [(kind: not_a_kind, path: 3)])")
            .unwrap_err();
        assert!(matches!(err, BandStageError::Manifest(_)));
    }
}
