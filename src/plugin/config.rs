use bevy::prelude::Resource;

/// Configuration object used to enable/disable individual subsystems of the
/// plugin.
#[derive(Debug, Clone, Resource)]
pub struct BandStageConfig {
    pub sfx: bool,
    pub hud: bool,
    pub diagnostics: bool,
}

impl Default for BandStageConfig {
    fn default() -> Self {
        Self {
            sfx: true,
            hud: true,
            diagnostics: true,
        }
    }
}

impl BandStageConfig {
    pub fn sfx(mut self, enabled: bool) -> Self {
        self.sfx = enabled;
        self
    }

    pub fn hud(mut self, enabled: bool) -> Self {
        self.hud = enabled;
        self
    }

    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}
