use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::loader::{FileKind, MAX_SHEETS};
use crate::processing::peaks::{DEFAULT_HALF_WIDTH, MAX_HALF_WIDTH, MIN_HALF_WIDTH};
use crate::processing::selection::AxisSelection;
use crate::state::palette::ColorPalette;
use crate::state::theme::Theme;

/// Opacity choices offered for markers.
pub const OPACITY_CHOICES: [f32; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
/// Marker size choices, in points.
pub const SIZE_CHOICES: [f32; 10] = [3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];

pub const DEFAULT_OPACITY: f32 = 0.5;
pub const DEFAULT_MARKER_SIZE: f32 = 5.0;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

fn out_of_range(field: &'static str, value: impl std::fmt::Display) -> SettingsError {
    SettingsError::OutOfRange { field, value: value.to_string() }
}

/// How an upload should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    pub kind: FileKind,
    /// Number of leading sheets to stack (spreadsheets only).
    pub sheet_count: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { kind: FileKind::default(), sheet_count: 1 }
    }
}

impl IngestOptions {
    fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_SHEETS).contains(&self.sheet_count) {
            return Err(out_of_range("sheet_count", self.sheet_count));
        }
        Ok(())
    }
}

/// Everything about a scatter plot except the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSettings {
    pub ingest: IngestOptions,
    pub axes: AxisSelection,
    pub palette: ColorPalette,
    pub opacity: f32,
    pub marker_size: f32,
    pub x_title: String,
    pub y_title: String,
    /// Only shown on 3-D plots.
    pub z_title: String,
}

impl ScatterSettings {
    fn with_axes(axes: AxisSelection) -> Self {
        Self {
            ingest: IngestOptions::default(),
            axes,
            palette: ColorPalette::default(),
            opacity: DEFAULT_OPACITY,
            marker_size: DEFAULT_MARKER_SIZE,
            x_title: "x".to_string(),
            y_title: "y".to_string(),
            z_title: "z".to_string(),
        }
    }

    pub fn planar() -> Self {
        Self::with_axes(AxisSelection::planar())
    }

    pub fn spatial() -> Self {
        Self::with_axes(AxisSelection::spatial())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.ingest.validate()?;
        if !OPACITY_CHOICES.contains(&self.opacity) {
            return Err(out_of_range("opacity", self.opacity));
        }
        if !SIZE_CHOICES.contains(&self.marker_size) {
            return Err(out_of_range("marker_size", self.marker_size));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSettings {
    pub ingest: IngestOptions,
    pub x_column: usize,
    pub y_column: usize,
    pub half_width: usize,
}

impl Default for PeakSettings {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default(),
            x_column: 0,
            y_column: 1,
            half_width: DEFAULT_HALF_WIDTH,
        }
    }
}

impl PeakSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        self.ingest.validate()?;
        if !(MIN_HALF_WIDTH..=MAX_HALF_WIDTH).contains(&self.half_width) {
            return Err(out_of_range("half_width", self.half_width));
        }
        Ok(())
    }
}

/// A saved preset of all panel settings. Uploaded data is never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPreset {
    pub theme: Theme,
    pub planar: ScatterSettings,
    pub spatial: ScatterSettings,
    pub peaks: PeakSettings,
}

impl Default for SettingsPreset {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            planar: ScatterSettings::planar(),
            spatial: ScatterSettings::spatial(),
            peaks: PeakSettings::default(),
        }
    }
}

impl SettingsPreset {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Read a preset, rejecting values the controls cannot represent.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let data = std::fs::read(path)?;
        let preset: Self = serde_json::from_slice(&data)?;
        preset.validate()?;
        Ok(preset)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.planar.validate()?;
        self.spatial.validate()?;
        self.peaks.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::selection::LabelColumn;

    #[test]
    fn defaults_match_the_controls() {
        let preset = SettingsPreset::default();
        assert_eq!(preset.planar.palette, ColorPalette::Viridis);
        assert_eq!(preset.planar.opacity, 0.5);
        assert_eq!(preset.planar.marker_size, 5.0);
        assert_eq!(preset.planar.ingest.kind, FileKind::TabSeparated);
        assert_eq!(preset.spatial.axes.z, Some(2));
        assert_eq!(preset.peaks.half_width, 63);
        assert!(OPACITY_CHOICES.contains(&DEFAULT_OPACITY));
        assert!(SIZE_CHOICES.contains(&DEFAULT_MARKER_SIZE));
    }

    #[test]
    fn preset_survives_a_file_round_trip() {
        let mut preset = SettingsPreset::default();
        preset.theme = Theme::Light;
        preset.planar.axes.label = LabelColumn::Column(2);
        preset.planar.palette = ColorPalette::Icefire;
        preset.spatial.ingest = IngestOptions { kind: FileKind::Spreadsheet, sheet_count: 3 };
        preset.peaks.half_width = 12;

        let path = std::env::temp_dir().join(format!("plot_playground_preset_{}.json", std::process::id()));
        preset.save_to_file(&path).unwrap();
        let loaded = SettingsPreset::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, preset);
    }

    #[test]
    fn bad_preset_is_a_json_error() {
        let path = std::env::temp_dir().join(format!("plot_playground_bad_{}.json", std::process::id()));
        std::fs::write(&path, b"{ not json").unwrap();
        let err = SettingsPreset::load_from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    fn load_edited(name: &str, edit: impl FnOnce(&mut serde_json::Value)) -> Result<SettingsPreset, SettingsError> {
        let mut value = serde_json::to_value(SettingsPreset::default()).unwrap();
        edit(&mut value);
        let path = std::env::temp_dir().join(format!("plot_playground_{name}_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        let loaded = SettingsPreset::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        loaded
    }

    #[test]
    fn out_of_range_preset_is_rejected() {
        let err = load_edited("sheets", |v| {
            v["planar"]["ingest"]["kind"] = "CommaSeparated".into();
            v["planar"]["ingest"]["sheet_count"] = u64::MAX.into();
        })
        .unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "sheet_count", .. }));

        let err = load_edited("half_width", |v| v["peaks"]["half_width"] = 126.into()).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "half_width", .. }));

        let err = load_edited("opacity", |v| v["spatial"]["opacity"] = 0.55.into()).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "opacity", .. }));

        let err = load_edited("size", |v| v["planar"]["marker_size"] = 40.0.into()).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "marker_size", .. }));

        assert!(load_edited("valid", |v| v["peaks"]["half_width"] = 1.into()).is_ok());
    }
}
