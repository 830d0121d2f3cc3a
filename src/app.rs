use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::data::loader::FileKind;
use crate::data::payload::Payload;
use crate::error::PlotError;
use crate::state::app_state::{AppState, VERSION};
use crate::state::panel_state::{parse_upload, PanelId, Upload};
use crate::state::plot_settings::{IngestOptions, SettingsPreset};
use crate::ui::ingest_controls::IngestAction;
use crate::ui::{peak_panel, scatter_panel};

/// Where the bytes of an upload come from.
enum UploadSource {
    Path(PathBuf),
    Payload(Payload),
}

impl UploadSource {
    fn suggested_kind(&self) -> Option<FileKind> {
        match self {
            UploadSource::Path(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(FileKind::from_extension),
            UploadSource::Payload(payload) => payload.suggested_kind(),
        }
    }
}

/// Pending async parse result for one panel.
struct PendingLoad {
    panel: PanelId,
    result: Arc<Mutex<Option<Result<Upload, PlotError>>>>,
}

/// Text box for pasting a `data:` URI into a panel.
struct DataUriDialog {
    panel: PanelId,
    text: String,
}

pub struct PlotPlaygroundApp {
    pub state: AppState,
    pending_loads: Vec<PendingLoad>,
    data_uri_dialog: Option<DataUriDialog>,
    /// Ingest options a re-parse was last started with, so a failing
    /// re-parse is not retried every frame.
    reparse_attempts: HashMap<PanelId, IngestOptions>,
    /// Screen rect of each panel from the last frame, for drop targeting.
    panel_rects: HashMap<PanelId, egui::Rect>,
    /// Preset errors; panel errors are shown on the panel itself.
    error_message: Option<String>,
    show_about: bool,
}

impl PlotPlaygroundApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.0));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(20.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.spacing.button_padding = egui::vec2(10.0, 4.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);
        ctx.set_visuals(styled_visuals(&state));

        Self {
            state,
            pending_loads: Vec::new(),
            data_uri_dialog: None,
            reparse_attempts: HashMap::new(),
            panel_rects: HashMap::new(),
            error_message: None,
            show_about: false,
        }
    }

    fn is_loading(&self, panel: PanelId) -> bool {
        self.pending_loads.iter().any(|p| p.panel == panel)
    }

    /// Open a native file dialog for `panel`.
    fn open_file_dialog(&mut self, panel: PanelId) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["txt", "tsv", "csv", "xls", "xlsx", "xlsm", "ods"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.open_upload(panel, UploadSource::Path(path));
        }
    }

    /// A fresh upload: pre-select the file kind from its name or MIME type,
    /// then parse it.
    fn open_upload(&mut self, panel: PanelId, source: UploadSource) {
        if let Some(kind) = source.suggested_kind() {
            self.state.panel_mut(panel).ingest_options_mut().kind = kind;
        }
        self.reparse_attempts.remove(&panel);
        let options = self.state.panel(panel).ingest_options();
        self.spawn_parse(panel, source, options);
    }

    /// Parse on a worker thread so the UI stays responsive. A newer request
    /// for the same panel supersedes an older one.
    fn spawn_parse(&mut self, panel: PanelId, source: UploadSource, options: IngestOptions) {
        let result: Arc<Mutex<Option<Result<Upload, PlotError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let parsed = catch_worker_panic(move || {
                let payload = match source {
                    UploadSource::Path(path) => Payload::from_path(&path)?,
                    UploadSource::Payload(payload) => payload,
                };
                parse_upload(payload, options)
            });
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(parsed);
            }
        });

        self.pending_loads.retain(|p| p.panel != panel);
        self.pending_loads.push(PendingLoad { panel, result });
    }

    /// Re-parse uploads whose file kind or sheet count changed.
    fn reparse_changed(&mut self) {
        for id in PanelId::ALL {
            if self.is_loading(id) {
                continue;
            }
            let panel = self.state.panel(id);
            let options = panel.ingest_options();
            if !panel.needs_reparse() || self.reparse_attempts.get(&id) == Some(&options) {
                continue;
            }
            let Some(payload) = panel.upload().map(|u| u.payload.clone()) else {
                continue;
            };
            tracing::debug!("Re-parsing {:?} upload with {:?}", id, options);
            self.reparse_attempts.insert(id, options);
            self.spawn_parse(id, UploadSource::Payload(payload), options);
        }
    }

    fn poll_pending_loads(&mut self) {
        let mut finished = Vec::new();
        self.pending_loads.retain(|pending| match pending.result.lock() {
            Ok(mut slot) => match slot.take() {
                Some(result) => {
                    finished.push((pending.panel, result));
                    false
                }
                None => true,
            },
            Err(_) => {
                tracing::error!("Parser thread for {:?} panicked", pending.panel);
                false
            }
        });

        for (id, result) in finished {
            let panel = self.state.panel_mut(id);
            match result {
                Ok(upload) => {
                    tracing::info!(
                        "Loaded {} into {:?}: {} rows x {} columns",
                        upload.file_label(),
                        id,
                        upload.table.row_count(),
                        upload.table.column_count()
                    );
                    *panel.error_mut() = None;
                    panel.accept_upload(upload);
                }
                Err(e) => panel.report_error(&e),
            }
        }
    }

    /// Dropped files go to the panel under the pointer, else the 2D panel.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (dropped, pointer) = ctx.input(|i| (i.raw.dropped_files.clone(), i.pointer.hover_pos()));
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let target = pointer
            .and_then(|p| {
                PanelId::ALL
                    .into_iter()
                    .find(|id| self.panel_rects.get(id).is_some_and(|r| r.contains(p)))
            })
            .unwrap_or(PanelId::Planar);

        if let Some(path) = file.path {
            self.open_upload(target, UploadSource::Path(path));
        } else if let Some(bytes) = file.bytes {
            let name = (!file.name.is_empty()).then_some(file.name);
            match Payload::from_bytes(bytes.to_vec(), name) {
                Ok(payload) => self.open_upload(target, UploadSource::Payload(payload)),
                Err(e) => self.state.panel_mut(target).report_error(&PlotError::from(e)),
            }
        }
    }

    fn save_preset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("plot_settings.json")
            .add_filter("Settings preset", &["json"])
            .save_file()
        {
            match self.state.preset().save_to_file(&path) {
                Ok(()) => tracing::info!("Preset saved to {:?}", path),
                Err(e) => {
                    tracing::error!("Failed to save preset: {e}");
                    self.error_message = Some(PlotError::from(e).to_string());
                }
            }
        }
    }

    fn load_preset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Settings preset", &["json"])
            .pick_file()
        {
            match SettingsPreset::load_from_file(&path) {
                Ok(preset) => {
                    self.state.apply_preset(preset);
                    tracing::info!("Preset loaded from {:?}", path);
                }
                Err(e) => {
                    tracing::error!("Failed to load preset: {e}");
                    self.error_message = Some(PlotError::from(e).to_string());
                }
            }
        }
    }

    fn show_data_uri_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.data_uri_dialog.as_mut() else {
            return;
        };

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new(format!("Paste data URI: {}", dialog.panel.title()))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(480.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("data:<mime>;base64,<content>").weak());
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut dialog.text)
                            .code_editor()
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let load_btn = egui::Button::new(egui::RichText::new("Load").strong()).min_size(egui::vec2(80.0, 28.0));
                    if ui.add_enabled(!dialog.text.trim().is_empty(), load_btn).clicked() {
                        submit = true;
                    }
                    if ui.add(egui::Button::new("Cancel").min_size(egui::vec2(80.0, 28.0))).clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            let panel = dialog.panel;
            match Payload::from_data_uri(&dialog.text) {
                Ok(payload) => self.open_upload(panel, UploadSource::Payload(payload)),
                Err(e) => self.state.panel_mut(panel).report_error(&PlotError::from(e)),
            }
        }
        if submit || cancel || !open {
            self.data_uri_dialog = None;
        }
    }
}

/// Run a worker job, turning a panic into an error so the slot is always filled.
fn catch_worker_panic<T>(job: impl FnOnce() -> Result<T, PlotError>) -> Result<T, PlotError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).unwrap_or_else(|_| {
        tracing::error!("Parser thread panicked");
        Err(PlotError::WorkerPanicked)
    })
}

fn styled_visuals(state: &AppState) -> egui::Visuals {
    let mut vis = state.theme.visuals();
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis
}

impl eframe::App for PlotPlaygroundApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(styled_visuals(&self.state));

        // ------------------------------------------------------------------
        // 1. Uploads: drops, finished parses, re-parses
        // ------------------------------------------------------------------
        self.handle_dropped_files(ctx);
        self.poll_pending_loads();
        self.reparse_changed();

        // --- Header panel ---
        let mut save_preset = false;
        let mut load_preset = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let heading = ui.heading("Plot Playground");
                    heading.context_menu(|ui| {
                        if ui.button("About").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                    });

                    ui.separator();
                    if ui.button("Save settings").clicked() {
                        save_preset = true;
                    }
                    if ui.button("Load settings").clicked() {
                        load_preset = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = format!("{} Mode", self.state.theme.toggle().label());
                        if ui.button(theme_label).clicked() {
                            self.state.theme = self.state.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if save_preset {
            self.save_preset();
        }
        if load_preset {
            self.load_preset();
        }

        // --- Footer panel ---
        if self.error_message.is_some() {
            egui::TopBottomPanel::bottom("footer")
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if let Some(msg) = &self.error_message {
                            ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        }
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    });
                });
        }

        // ------------------------------------------------------------------
        // 2. Panels
        // ------------------------------------------------------------------
        let mut actions: Vec<(PanelId, IngestAction)> = Vec::new();
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default().show(ctx, |ui| {
            let plot_height = (ui.available_height() * 0.6).clamp(300.0, 520.0);
            let theme = self.state.theme;

            egui::ScrollArea::vertical().show(ui, |ui| {
                for id in PanelId::ALL {
                    let loading = self.is_loading(id);
                    let frame = egui::Frame::group(ui.style())
                        .inner_margin(egui::Margin::same(10))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.heading(id.title());
                                if loading {
                                    ui.spinner();
                                    ui.label(egui::RichText::new("Parsing...").weak());
                                }
                            });
                            ui.add_space(4.0);
                            ui.push_id(id, |ui| match id {
                                PanelId::Planar => scatter_panel::show_scatter_panel(
                                    ui,
                                    id,
                                    &mut self.state.planar,
                                    &theme,
                                    plot_height,
                                ),
                                PanelId::Spatial => scatter_panel::show_scatter_panel(
                                    ui,
                                    id,
                                    &mut self.state.spatial,
                                    &theme,
                                    plot_height,
                                ),
                                PanelId::Peaks => peak_panel::show_peak_panel(
                                    ui,
                                    id,
                                    &mut self.state.peaks,
                                    &theme,
                                    plot_height,
                                ),
                            })
                            .inner
                        });

                    let rect = frame.response.rect;
                    self.panel_rects.insert(id, rect);
                    if frame.inner != IngestAction::None {
                        actions.push((id, frame.inner));
                    }

                    if hovering_files
                        && ui.ctx().pointer_hover_pos().is_some_and(|p| rect.contains(p))
                    {
                        ui.painter().rect_stroke(
                            rect,
                            6.0,
                            egui::Stroke::new(3.0, egui::Color32::from_rgb(80, 140, 255)),
                            egui::StrokeKind::Inside,
                        );
                    }
                    ui.add_space(10.0);
                }
            });
        });

        // ------------------------------------------------------------------
        // 3. Process collected panel actions
        // ------------------------------------------------------------------
        for (id, action) in actions {
            match action {
                IngestAction::SelectFile => self.open_file_dialog(id),
                IngestAction::PasteDataUri => {
                    self.data_uri_dialog = Some(DataUriDialog { panel: id, text: String::new() });
                }
                IngestAction::None => {}
            }
        }

        self.show_data_uri_dialog(ctx);

        if self.show_about {
            egui::Window::new("About Plot Playground")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Scatter plots in 2D and 3D, and peak picking, from uploaded tables.");
                    ui.add_space(6.0);
                    ui.label("  \u{2022} Tab or comma separated text, or .xlsx / .xls");
                    ui.label("  \u{2022} Select file, paste a data URI, or drag and drop");
                    ui.label("  \u{2022} Settings save to and load from JSON");
                });
        }

        if !self.pending_loads.is_empty() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_panic_becomes_an_error() {
        let result: Result<(), PlotError> = catch_worker_panic(|| panic!("bad workbook"));
        assert!(matches!(result, Err(PlotError::WorkerPanicked)));

        let result = catch_worker_panic(|| Ok(7));
        assert!(matches!(result, Ok(7)));
    }

    #[test]
    fn worker_result_reaches_the_slot_after_a_panic() {
        let slot: Arc<Mutex<Option<Result<(), PlotError>>>> = Arc::new(Mutex::new(None));
        let slot_clone = Arc::clone(&slot);
        std::thread::spawn(move || {
            let parsed = catch_worker_panic(|| -> Result<(), PlotError> { panic!("capacity overflow") });
            if let Ok(mut s) = slot_clone.lock() {
                *s = Some(parsed);
            }
        })
        .join()
        .unwrap();
        assert!(matches!(slot.lock().unwrap().take(), Some(Err(PlotError::WorkerPanicked))));
    }
}
