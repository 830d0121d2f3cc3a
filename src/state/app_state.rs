use crate::state::panel_state::{PanelId, PeakPanelState, ScatterPanelState, UploadPanel};
use crate::state::plot_settings::{PeakSettings, ScatterSettings, SettingsPreset};
use crate::state::theme::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the window shows. Each panel owns its own upload.
pub struct AppState {
    pub theme: Theme,
    pub planar: ScatterPanelState,
    pub spatial: ScatterPanelState,
    pub peaks: PeakPanelState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            planar: ScatterPanelState::new(ScatterSettings::planar()),
            spatial: ScatterPanelState::new(ScatterSettings::spatial()),
            peaks: PeakPanelState::new(PeakSettings::default()),
        }
    }

    pub fn panel(&self, id: PanelId) -> &dyn UploadPanel {
        match id {
            PanelId::Planar => &self.planar,
            PanelId::Spatial => &self.spatial,
            PanelId::Peaks => &self.peaks,
        }
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut dyn UploadPanel {
        match id {
            PanelId::Planar => &mut self.planar,
            PanelId::Spatial => &mut self.spatial,
            PanelId::Peaks => &mut self.peaks,
        }
    }

    /// Snapshot of the current settings, without any uploaded data.
    pub fn preset(&self) -> SettingsPreset {
        SettingsPreset {
            theme: self.theme,
            planar: self.planar.settings.clone(),
            spatial: self.spatial.settings.clone(),
            peaks: self.peaks.settings.clone(),
        }
    }

    /// Replace all settings. Uploads are kept and re-derived on the next
    /// refresh; panels whose ingest options changed will ask for a re-parse.
    pub fn apply_preset(&mut self, preset: SettingsPreset) {
        self.theme = preset.theme;
        self.planar.settings = preset.planar;
        self.spatial.settings = preset.spatial;
        self.peaks.settings = preset.peaks;
        self.planar.refresh();
        self.spatial.refresh();
        self.peaks.refresh();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::FileKind;
    use crate::state::palette::ColorPalette;

    #[test]
    fn panels_start_independent() {
        let state = AppState::new();
        assert!(!state.planar.is_spatial());
        assert!(state.spatial.is_spatial());
        for id in PanelId::ALL {
            assert!(state.panel(id).upload().is_none());
        }
    }

    #[test]
    fn preset_round_trips_through_state() {
        let mut state = AppState::new();
        let mut preset = state.preset();
        preset.theme = Theme::Dark;
        preset.planar.palette = ColorPalette::Plasma;
        preset.peaks.ingest.kind = FileKind::Spreadsheet;
        state.apply_preset(preset.clone());
        assert_eq!(state.preset(), preset);
        assert_eq!(state.panel(PanelId::Peaks).ingest_options().kind, FileKind::Spreadsheet);
    }
}
