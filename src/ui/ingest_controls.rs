use crate::data::loader::{FileKind, MAX_SHEETS};
use crate::state::panel_state::{PanelId, UploadPanel};

/// Upload requests raised from a panel's controls, handled by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestAction {
    None,
    SelectFile,
    PasteDataUri,
}

/// File kind radio buttons, sheet count, and the upload buttons.
pub fn show_ingest_controls(ui: &mut egui::Ui, id: PanelId, panel: &mut dyn UploadPanel) -> IngestAction {
    let mut action = IngestAction::None;

    ui.horizontal(|ui| {
        let options = panel.ingest_options_mut();
        ui.label(egui::RichText::new("File type").strong());
        for kind in FileKind::ALL {
            ui.radio_value(&mut options.kind, kind, kind.label());
        }

        ui.separator();

        let is_spreadsheet = options.kind == FileKind::Spreadsheet;
        ui.add_enabled_ui(is_spreadsheet, |ui| {
            ui.label("Sheets");
            egui::ComboBox::from_id_salt(("sheet_count", id))
                .selected_text(format!("first {}", options.sheet_count))
                .width(80.0)
                .show_ui(ui, |ui| {
                    for n in 1..=MAX_SHEETS {
                        ui.selectable_value(&mut options.sheet_count, n, format!("first {n}"));
                    }
                });
        });
    });

    ui.horizontal(|ui| {
        if ui.button("Select file").clicked() {
            action = IngestAction::SelectFile;
        }
        if ui.button("Paste data URI").clicked() {
            action = IngestAction::PasteDataUri;
        }

        ui.separator();
        match panel.upload() {
            Some(upload) => {
                ui.label(egui::RichText::new(upload.file_label()).monospace());
                ui.label(
                    egui::RichText::new(format!(
                        "{} rows x {} columns",
                        upload.table.row_count(),
                        upload.table.column_count()
                    ))
                    .weak(),
                );
            }
            None => {
                ui.label(egui::RichText::new("no file").weak());
            }
        }
    });

    if let Some(msg) = panel.error_mut().clone() {
        ui.horizontal(|ui| {
            ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
            if ui.small_button("dismiss").clicked() {
                *panel.error_mut() = None;
            }
        });
    }

    action
}
