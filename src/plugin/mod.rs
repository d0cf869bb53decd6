//! Plugin orchestration for stage SFX and the score HUD within Bevy.
//!
//! This module contains the main Bevy plugin definition, configuration, and
//! system wiring that integrates SFX request handling and the per-frame HUD
//! refresh into any Bevy application.

mod config;

pub use config::BandStageConfig;

use crate::diagnostics::{register as register_diagnostics, update_diagnostics};
use crate::events::{PlaySfx, SongStarted};
use crate::hud::{prepare_song_clock, render_star_display, update_score_hud, ScoreHudState};
use crate::session::GameSession;
use crate::sfx::{load_sfx_bank, process_sfx_requests, SfxSettings};
use bevy::prelude::*;

/// Bevy plugin wiring stage SFX playback and the score HUD into an app.
#[derive(Default)]
pub struct BandStagePlugin {
    config: BandStageConfig,
}

impl BandStagePlugin {
    /// Create a plugin instance with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin instance using the provided configuration.
    pub fn with_config(config: BandStageConfig) -> Self {
        Self { config }
    }

    /// Apply mutations to the internal configuration prior to registering.
    pub fn configure(mut self, configure: impl FnOnce(&mut BandStageConfig)) -> Self {
        configure(&mut self.config);
        self
    }

    /// Access the current configuration.
    pub fn config(&self) -> &BandStageConfig {
        &self.config
    }
}

impl Plugin for BandStagePlugin {
    fn build(&self, app: &mut App) {
        // Expose configuration and the shared session/HUD resources.
        app.insert_resource(self.config.clone());
        app.init_resource::<SfxSettings>();
        app.init_resource::<GameSession>();
        app.init_resource::<ScoreHudState>();

        // Message channels always exist; systems are gated by configuration
        // so disabled subsystems cost nothing per frame.
        app.add_message::<PlaySfx>();
        app.add_message::<SongStarted>();

        if self.config.sfx {
            app.add_systems(Startup, load_sfx_bank);
            app.add_systems(Update, process_sfx_requests);
        }

        if self.config.hud {
            app.add_systems(
                Update,
                (prepare_song_clock, update_score_hud, render_star_display).chain(),
            );
        }

        if self.config.diagnostics {
            register_diagnostics(app);
            app.add_systems(Update, update_diagnostics);
        }
    }
}
