use crate::data::loader::{load_table, FileKind, SheetSelection};
use crate::data::payload::Payload;
use crate::data::table::Table;
use crate::error::PlotError;
use crate::plot3d::camera::OrbitalCamera;
use crate::processing::kd_tree::HoverTree;
use crate::processing::peaks::{pick_peaks, PeakReport};
use crate::processing::selection::{select_scatter, AxisSelection, ScatterData};
use crate::render::plot_interaction::PlotViewState;
use crate::state::plot_settings::{IngestOptions, PeakSettings, ScatterSettings};

/// The three independent panels of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Planar,
    Spatial,
    Peaks,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Planar, PanelId::Spatial, PanelId::Peaks];

    pub fn title(&self) -> &'static str {
        match self {
            PanelId::Planar => "2D plot",
            PanelId::Spatial => "3D plot",
            PanelId::Peaks => "Peak picking",
        }
    }
}

/// A parsed upload together with the bytes it came from, so that changing
/// the file kind or sheet count can re-parse without a new upload.
pub struct Upload {
    pub payload: Payload,
    pub table: Table,
    pub parsed_with: IngestOptions,
}

impl Upload {
    pub fn file_label(&self) -> String {
        self.payload
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{} byte upload", self.payload.bytes.len()))
    }
}

/// Parse a payload the way `options` describe.
pub fn parse_upload(payload: Payload, options: IngestOptions) -> Result<Upload, PlotError> {
    let sheets = match options.kind {
        FileKind::Spreadsheet => SheetSelection::first(options.sheet_count)?,
        FileKind::TabSeparated | FileKind::CommaSeparated => SheetSelection::default(),
    };
    let table = load_table(&payload.bytes, options.kind, &sheets)?;
    Ok(Upload { payload, table, parsed_with: options })
}

/// Common surface of panels that accept uploads.
pub trait UploadPanel {
    fn ingest_options(&self) -> IngestOptions;
    fn ingest_options_mut(&mut self) -> &mut IngestOptions;
    fn upload(&self) -> Option<&Upload>;
    /// Replace the current upload and recompute derived data.
    fn accept_upload(&mut self, upload: Upload);
    fn error_mut(&mut self) -> &mut Option<String>;

    /// The current upload was parsed with options that have since changed.
    fn needs_reparse(&self) -> bool {
        self.upload()
            .is_some_and(|u| u.parsed_with != self.ingest_options())
    }

    fn report_error(&mut self, err: &PlotError) {
        tracing::warn!("{err}");
        *self.error_mut() = Some(err.to_string());
    }
}

/// State of one scatter panel (2-D or 3-D).
pub struct ScatterPanelState {
    pub settings: ScatterSettings,
    pub upload: Option<Upload>,
    pub data: Option<ScatterData>,
    pub hover: Option<HoverTree>,
    pub error: Option<String>,
    pub view: PlotViewState,
    pub camera: OrbitalCamera,
    selected_with: Option<AxisSelection>,
}

impl ScatterPanelState {
    pub fn new(settings: ScatterSettings) -> Self {
        Self {
            settings,
            upload: None,
            data: None,
            hover: None,
            error: None,
            view: PlotViewState::new(),
            camera: OrbitalCamera::default(),
            selected_with: None,
        }
    }

    pub fn is_spatial(&self) -> bool {
        self.settings.axes.z.is_some()
    }

    /// Re-slice the table when the axis selection changed.
    pub fn refresh(&mut self) {
        let Some(upload) = &self.upload else {
            return;
        };
        if self.selected_with == Some(self.settings.axes) {
            return;
        }
        self.selected_with = Some(self.settings.axes);

        match select_scatter(&upload.table, &self.settings.axes) {
            Ok(data) => {
                // Only the 2-D plot has hover tooltips.
                self.hover = if self.is_spatial() { None } else { HoverTree::build(&data.x, &data.y) };
                self.data = Some(data);
                self.view.auto_fit = true;
                self.error = None;
            }
            Err(e) => {
                self.data = None;
                self.hover = None;
                self.report_error(&PlotError::from(e));
            }
        }
    }
}

impl UploadPanel for ScatterPanelState {
    fn ingest_options(&self) -> IngestOptions {
        self.settings.ingest
    }

    fn ingest_options_mut(&mut self) -> &mut IngestOptions {
        &mut self.settings.ingest
    }

    fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    fn accept_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
        self.selected_with = None;
        self.refresh();
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

/// Signal and detected extrema for the peak panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub report: PeakReport,
}

/// Run peak picking over the configured columns of `table`.
pub fn trace_peaks(table: &Table, settings: &PeakSettings) -> Result<PeakTrace, PlotError> {
    let x = table.column(settings.x_column)?;
    let y = table.column(settings.y_column)?.to_f64();
    let report = pick_peaks(&x.values, &y, settings.half_width)?;
    Ok(PeakTrace { x: x.to_f64(), y, report })
}

pub struct PeakPanelState {
    pub settings: PeakSettings,
    pub upload: Option<Upload>,
    pub trace: Option<PeakTrace>,
    pub error: Option<String>,
    pub view: PlotViewState,
    computed_with: Option<(usize, usize, usize)>,
}

impl PeakPanelState {
    pub fn new(settings: PeakSettings) -> Self {
        Self {
            settings,
            upload: None,
            trace: None,
            error: None,
            view: PlotViewState::new(),
            computed_with: None,
        }
    }

    /// Recompute extrema when the columns or half-width changed.
    pub fn refresh(&mut self) {
        let Some(upload) = &self.upload else {
            return;
        };
        let key = (self.settings.x_column, self.settings.y_column, self.settings.half_width);
        if self.computed_with == Some(key) {
            return;
        }
        let columns_changed = self.computed_with.map_or(true, |(x, y, _)| (x, y) != (key.0, key.1));
        self.computed_with = Some(key);

        match trace_peaks(&upload.table, &self.settings) {
            Ok(trace) => {
                self.trace = Some(trace);
                self.error = None;
                if columns_changed {
                    self.view.auto_fit = true;
                }
            }
            Err(e) => {
                self.trace = None;
                self.report_error(&e);
            }
        }
    }
}

impl UploadPanel for PeakPanelState {
    fn ingest_options(&self) -> IngestOptions {
        self.settings.ingest
    }

    fn ingest_options_mut(&mut self) -> &mut IngestOptions {
        &mut self.settings.ingest
    }

    fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    fn accept_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
        self.computed_with = None;
        self.refresh();
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::selection::LabelColumn;

    fn csv_upload(text: &str) -> Upload {
        let payload = Payload::from_bytes(text.as_bytes().to_vec(), Some("data.csv".into())).unwrap();
        parse_upload(payload, IngestOptions { kind: FileKind::CommaSeparated, sheet_count: 1 }).unwrap()
    }

    #[test]
    fn scatter_panel_selects_on_upload_and_on_axis_change() {
        let mut panel = ScatterPanelState::new(ScatterSettings::planar());
        panel.settings.ingest.kind = FileKind::CommaSeparated;
        panel.accept_upload(csv_upload("1,2,a\n3,4,b\n"));
        assert_eq!(panel.data.as_ref().unwrap().y, vec![2.0, 4.0]);
        assert!(panel.hover.is_some());

        panel.settings.axes.label = LabelColumn::Column(2);
        panel.refresh();
        assert_eq!(panel.data.as_ref().unwrap().labels.codes, vec![0, 1]);

        panel.settings.axes.y = 5;
        panel.refresh();
        assert!(panel.data.is_none());
        assert!(panel.error.as_deref().unwrap().contains("column 5"));
    }

    #[test]
    fn spatial_panel_skips_the_hover_tree() {
        let mut panel = ScatterPanelState::new(ScatterSettings::spatial());
        panel.accept_upload(csv_upload("1,2,3\n4,5,6\n"));
        assert_eq!(panel.data.as_ref().unwrap().plotted_count(), 2);
        assert!(panel.hover.is_none());
    }

    #[test]
    fn repeated_x_values_still_get_a_hover_tree() {
        let text: String = (0..100).map(|i| format!("1,{i}\n")).collect();
        let mut panel = ScatterPanelState::new(ScatterSettings::planar());
        panel.accept_upload(csv_upload(&text));
        assert_eq!(panel.hover.as_ref().unwrap().nearest(1.0, 57.0), 57);
    }

    #[test]
    fn sheet_count_only_matters_for_spreadsheets() {
        let payload = Payload::from_bytes(b"1,2\n".to_vec(), None).unwrap();
        let options = IngestOptions { kind: FileKind::CommaSeparated, sheet_count: usize::MAX };
        assert_eq!(parse_upload(payload.clone(), options).unwrap().table.row_count(), 1);

        let options = IngestOptions { kind: FileKind::Spreadsheet, sheet_count: usize::MAX };
        let err = parse_upload(payload, options).err().unwrap();
        assert!(err.to_string().contains("sheets"));
    }

    #[test]
    fn changing_ingest_options_requests_reparse() {
        let mut panel = ScatterPanelState::new(ScatterSettings::planar());
        panel.settings.ingest.kind = FileKind::CommaSeparated;
        panel.accept_upload(csv_upload("1,2\n"));
        assert!(!panel.needs_reparse());
        panel.ingest_options_mut().kind = FileKind::TabSeparated;
        assert!(panel.needs_reparse());
    }

    #[test]
    fn peak_panel_reports_extrema() {
        let mut panel = PeakPanelState::new(PeakSettings { half_width: 1, ..PeakSettings::default() });
        panel.accept_upload(csv_upload("0,1\n1,3\n2,1\n3,5\n4,1\n5,3\n6,1\n"));
        let trace = panel.trace.as_ref().unwrap();
        assert_eq!(trace.report.maxima_x, vec!["5", "3", "1"]);
        assert_eq!(trace.report.minima_x, vec!["4", "2"]);

        panel.settings.half_width = 0;
        panel.refresh();
        assert!(panel.trace.is_none());
        assert!(panel.error.is_some());
    }
}
