//! Score HUD components and per-frame update systems.
//!
//! The HUD is a read-only projection of [`GameSession`]: every frame the
//! update system polls the session (pull model, no subscriptions) and
//! mirrors it into the score text, the star row, the progress-bar fill, and
//! the song timer. The session is never mutated here.
//!
//! Rendering is deliberately lazy: score text and stars are rewritten only
//! when the band score actually changed, and the progress/timer widgets
//! stay untouched until [`SongStarted`] establishes the song length.

pub mod format;

use bevy::prelude::*;

use crate::events::SongStarted;
use crate::session::GameSession;
use crate::stars::band_star_value;

use self::format::{format_clock, format_score, format_stars};

/// Marker for the band-score text node.
///
/// The node's own `TextFont` should use a monospace-digit face so the score
/// does not jitter as digits change.
#[derive(Component)]
pub struct ScoreText;

/// Marker for the `current / total` song timer text node.
#[derive(Component)]
pub struct SongTimerText;

/// Fill node of the song progress bar; its width tracks song progress.
#[derive(Component)]
pub struct SongProgressFill;

/// Star widget state: the aggregate fractional star value for the band.
///
/// The HUD writes the value; [`render_star_display`] turns changed values
/// into the glyph row of the co-located `Text`.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct StarDisplay {
    stars: f64,
}

impl StarDisplay {
    /// Current aggregate star value.
    pub fn stars(&self) -> f64 {
        self.stars
    }

    /// Replace the aggregate star value.
    pub fn set_stars(&mut self, stars: f64) {
        self.stars = stars;
    }
}

/// Cached song length and display format, captured once per song.
#[derive(Debug, Clone)]
pub struct SongClock {
    /// Total song length in seconds.
    pub length_seconds: f64,
    /// Whether the hours-inclusive clock format is in effect.
    pub with_hours: bool,
    /// Pre-formatted total length, rendered once at song start.
    pub length_label: String,
}

impl SongClock {
    /// Derive the clock from a total song length in seconds.
    pub fn from_length(length_seconds: f64) -> Self {
        let with_hours = length_seconds >= 3600.0;
        Self {
            length_seconds,
            with_hours,
            length_label: format_clock(length_seconds, with_hours),
        }
    }
}

/// Frame-to-frame HUD state.
#[derive(Resource, Debug, Default)]
pub struct ScoreHudState {
    /// Last band score written into the score text.
    pub last_band_score: u32,
    /// Number of score re-renders performed (exported as a diagnostic).
    pub score_renders: u64,
    /// Song clock; `None` until the song-started notification arrives.
    pub song_clock: Option<SongClock>,
}

/// Spawn the default score HUD tree and return its root entity.
///
/// Layout: score text over the star row over a slim progress bar, with the
/// timer label underneath, anchored to the top-right corner. Games wanting
/// a different arrangement can spawn the marker components on their own
/// nodes instead; the update systems only care about the markers.
pub fn spawn_score_hud(commands: &mut Commands, font: Handle<Font>) -> Entity {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            right: Val::Px(24.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("0"),
                TextFont {
                    font: font.clone(),
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                ScoreText,
            ));
            parent.spawn((
                Text::new(format_stars(0.0)),
                TextFont {
                    font: font.clone(),
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.8, 0.0)),
                StarDisplay::default(),
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(260.0),
                        height: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.2, 0.8, 1.0)),
                        SongProgressFill,
                    ));
                });
            parent.spawn((
                Text::new(""),
                TextFont {
                    font,
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
                SongTimerText,
            ));
        })
        .id()
}

/// Captures the song clock when the song-started notification arrives.
pub fn prepare_song_clock(
    mut notifications: MessageReader<SongStarted>,
    session: Res<GameSession>,
    mut state: ResMut<ScoreHudState>,
) {
    if notifications.read().count() == 0 {
        return;
    }
    let clock = SongClock::from_length(session.song_length);
    info!("song clock armed: {}", clock.length_label);
    state.song_clock = Some(clock);
}

/// Per-frame HUD refresh; skipped entirely while the session is paused.
#[allow(clippy::type_complexity)]
pub fn update_score_hud(
    session: Res<GameSession>,
    mut state: ResMut<ScoreHudState>,
    mut score_texts: Query<&mut Text, (With<ScoreText>, Without<SongTimerText>)>,
    mut star_displays: Query<&mut StarDisplay>,
    mut progress_fills: Query<&mut Node, With<SongProgressFill>>,
    mut timer_texts: Query<&mut Text, (With<SongTimerText>, Without<ScoreText>)>,
) {
    if session.paused {
        return;
    }

    if session.band_score != state.last_band_score {
        state.last_band_score = session.band_score;
        state.score_renders += 1;

        let label = format_score(session.band_score);
        for mut text in score_texts.iter_mut() {
            text.0 = label.clone();
        }

        let stars = band_star_value(&session.players);
        for mut display in star_displays.iter_mut() {
            display.set_stars(stars);
        }
    }

    // Progress and timer stay untouched until the song clock is known.
    let Some(clock) = state.song_clock.as_ref() else {
        return;
    };

    let time = session.song_time.max(0.0);
    let fraction = if clock.length_seconds > 0.0 {
        ((time / clock.length_seconds) as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    for mut node in progress_fills.iter_mut() {
        node.width = Val::Percent(fraction * 100.0);
    }

    let label = format!(
        "{} / {}",
        format_clock(time, clock.with_hours),
        clock.length_label
    );
    for mut text in timer_texts.iter_mut() {
        text.0 = label.clone();
    }
}

/// Renders changed star values into their text rows.
pub fn render_star_display(
    mut displays: Query<(&StarDisplay, &mut Text), Changed<StarDisplay>>,
) {
    for (display, mut text) in displays.iter_mut() {
        text.0 = format_stars(display.stars());
    }
}
