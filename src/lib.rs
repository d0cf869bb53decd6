//! Stage audio cues and score HUD for a band rhythm game, as a Bevy plugin.
//!
//! This crate covers two client-side concerns of a rhythm-game application:
//!
//! - **SFX playback**: one-shot sound effects (menu clicks, note misses,
//!   star awards) played through an external sample engine. The crate only
//!   manages handle lifecycles and volume; decoding and mixing stay inside
//!   the engine boundary.
//! - **Score HUD**: per-frame systems mirroring the game session into score
//!   text, a fractional star display, a song progress bar, and a timer.
//!
//! # Features
//!
//! - **Handle-safe sample channels**: load once, play many, release exactly
//!   once (explicitly or on drop)
//! - **Category volume table**: per-effect volume scales under one master
//!   SFX volume
//! - **RON manifests**: declare the whole effect bank in a data file
//! - **Lazy HUD rendering**: score text and stars re-render only on change;
//!   the clock waits for the song-started notification
//! - **Diagnostics**: band score, song progress, and render counts exposed
//!   through Bevy's diagnostics store
//!
//! # Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_bandstage::{spawn_score_hud, BandStagePlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BandStagePlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, assets: Res<AssetServer>) {
//!     commands.spawn(Camera2d::default());
//!     spawn_score_hud(&mut commands, assets.load("fonts/hud.ttf"));
//! }
//! ```
//!
//! # Firing sound effects
//!
//! Register a bank once (any [`SampleEngine`] works; the `rodio-engine`
//! feature provides the production backend), then write [`PlaySfx`]
//! messages from gameplay systems:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_bandstage::{PlaySfx, SfxKind};
//!
//! fn on_note_missed(mut sfx: MessageWriter<PlaySfx>) {
//!     sfx.write(PlaySfx(SfxKind::NoteMiss));
//! }
//! ```
//!
//! # Driving the HUD
//!
//! The host game owns the [`GameSession`] resource and keeps it current;
//! the plugin only reads it. Send [`SongStarted`] once per song so the HUD
//! can capture the song length and pick its clock format:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_bandstage::{GameSession, SongStarted};
//!
//! fn begin_song(mut session: ResMut<GameSession>, mut started: MessageWriter<SongStarted>) {
//!     session.song_length = 247.0;
//!     started.write(SongStarted);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`engine`] - Sample-engine abstraction (pluggable implementations)
//! - [`sfx`] - Sample channels, the effect bank, and SFX request handling
//! - [`session`] - Read-only game-session surface polled by the HUD
//! - [`stars`] - Star-rating aggregation
//! - [`hud`] - HUD components, spawn helper, and update systems
//! - [`plugin`] - Bevy plugin integration and configuration
//! - [`diagnostics`] - Diagnostic paths and measurements

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod events;
pub mod hud;
pub mod plugin;
pub mod session;
pub mod sfx;
pub mod stars;

pub use diagnostics::{
    update_diagnostics, BAND_SCORE_PATH, SCORE_RENDERS_PATH, SONG_PROGRESS_PATH,
};
#[cfg(feature = "rodio-engine")]
pub use engine::RodioEngine;
pub use engine::{ChannelHandle, EngineErrorCode, NullEngine, SampleEngine, SampleHandle};
pub use error::{BandStageError, Result};
pub use events::{PlaySfx, SongStarted};
pub use hud::format::{format_clock, format_score, format_stars};
pub use hud::{
    prepare_song_clock, render_star_display, spawn_score_hud, update_score_hud, ScoreHudState,
    ScoreText, SongClock, SongProgressFill, SongTimerText, StarDisplay,
};
pub use plugin::{BandStageConfig, BandStagePlugin};
pub use session::{GameSession, PlayerScore};
pub use sfx::{
    load_sfx_bank, process_sfx_requests, SampleChannel, SfxBank, SfxBankConfig, SfxKind,
    SfxSampleDef, SfxSettings, DEFAULT_POLYPHONY,
};
pub use stars::{band_star_value, player_star_value, MAX_STARS};
