use bevy::prelude::*;

use crate::sfx::SfxKind;

/// Request to fire a one-shot sound effect of the given category.
#[derive(Event, Message, Clone, Copy, Debug)]
pub struct PlaySfx(pub SfxKind);

/// Fired by the host game exactly once per song, before the first running
/// frame. The HUD captures the song length and its display format on
/// delivery.
#[derive(Event, Message, Clone, Copy, Debug)]
pub struct SongStarted;
