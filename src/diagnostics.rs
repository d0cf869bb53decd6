use bevy::diagnostic::{Diagnostic, DiagnosticPath, Diagnostics, RegisterDiagnostic};
use bevy::prelude::*;

use crate::hud::ScoreHudState;
use crate::plugin::BandStageConfig;
use crate::session::GameSession;

pub const BAND_SCORE_PATH: DiagnosticPath = DiagnosticPath::const_new("bandstage/band_score");
pub const SONG_PROGRESS_PATH: DiagnosticPath = DiagnosticPath::const_new("bandstage/song_progress");
pub const SCORE_RENDERS_PATH: DiagnosticPath = DiagnosticPath::const_new("bandstage/score_renders");

pub fn register(app: &mut App) {
    app.register_diagnostic(Diagnostic::new(BAND_SCORE_PATH));
    app.register_diagnostic(Diagnostic::new(SONG_PROGRESS_PATH));
    app.register_diagnostic(Diagnostic::new(SCORE_RENDERS_PATH));
}

pub fn update_diagnostics(
    config: Res<BandStageConfig>,
    mut diagnostics: Diagnostics,
    session: Res<GameSession>,
    state: Res<ScoreHudState>,
) {
    if !config.diagnostics {
        return;
    }

    diagnostics.add_measurement(&BAND_SCORE_PATH, || session.band_score as f64);
    diagnostics.add_measurement(&SCORE_RENDERS_PATH, || state.score_renders as f64);

    let progress = state
        .song_clock
        .as_ref()
        .filter(|clock| clock.length_seconds > 0.0)
        .map(|clock| (session.song_time.max(0.0) / clock.length_seconds).clamp(0.0, 1.0))
        .unwrap_or(0.0);
    diagnostics.add_measurement(&SONG_PROGRESS_PATH, || progress);
}
