//! Read-only projection of the game session polled by the HUD.
//!
//! The host game owns and mutates [`GameSession`] every frame; this crate
//! only ever reads it.

use bevy::prelude::*;

/// Per-player score state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    /// Current score for this player.
    pub score: u32,
    /// Ascending score cutoffs for one through six stars.
    /// `star_thresholds[0] == 0` disables star gating for this player.
    pub star_thresholds: [u32; 6],
}

impl PlayerScore {
    /// Create a zero-score player with the given thresholds.
    pub fn new(star_thresholds: [u32; 6]) -> Self {
        Self {
            score: 0,
            star_thresholds,
        }
    }

    /// Whether this player participates in star aggregation.
    pub fn stars_enabled(&self) -> bool {
        self.star_thresholds[0] != 0
    }
}

/// Session state shared with the HUD.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    /// While true, the HUD freezes.
    pub paused: bool,
    /// Aggregate score across all players.
    pub band_score: u32,
    /// Elapsed song time in seconds. May briefly be negative during the
    /// count-in.
    pub song_time: f64,
    /// Total song length in seconds.
    pub song_length: f64,
    /// Players in seating order.
    pub players: Vec<PlayerScore>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            paused: false,
            band_score: 0,
            song_time: 0.0,
            song_length: 0.0,
            players: Vec::new(),
        }
    }
}
