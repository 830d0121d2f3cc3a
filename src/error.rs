use crate::data::loader::LoadError;
use crate::data::payload::PayloadError;
use crate::data::table::SelectionError;
use crate::processing::peaks::PeakError;
use crate::state::plot_settings::SettingsError;

/// Any failure a panel can show to the user.
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("upload failed: {0}")]
    Payload(#[from] PayloadError),
    #[error("malformed input: {0}")]
    Load(#[from] LoadError),
    #[error("invalid column selection: {0}")]
    Selection(#[from] SelectionError),
    #[error("peak picking failed: {0}")]
    Peak(#[from] PeakError),
    #[error("settings preset: {0}")]
    Settings(#[from] SettingsError),
    #[error("the parser crashed on this file")]
    WorkerPanicked,
}
