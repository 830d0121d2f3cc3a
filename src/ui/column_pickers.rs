use egui_extras::{Column, TableBuilder};

use crate::data::table::{column_name, Table};
use crate::processing::selection::LabelColumn;

/// Rows shown in the data preview.
const PREVIEW_ROWS: usize = 50;

/// Combo box choosing one column index out of `column_count`.
///
/// An index beyond the table stays selectable as-is, so a stale selection is
/// visible and reported by the panel rather than silently moved.
pub fn column_combo(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    label: &str,
    selected: &mut usize,
    column_count: usize,
) -> bool {
    let before = *selected;
    ui.label(label);
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(column_name(*selected))
        .width(110.0)
        .show_ui(ui, |ui| {
            for i in 0..column_count {
                ui.selectable_value(selected, i, column_name(i));
            }
        });
    *selected != before
}

/// Like [`column_combo`] with an extra "None" entry.
pub fn label_combo(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    selected: &mut LabelColumn,
    column_count: usize,
) -> bool {
    let before = *selected;
    let text = match *selected {
        LabelColumn::None => "None".to_string(),
        LabelColumn::Column(i) => column_name(i),
    };
    ui.label("Label");
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(text)
        .width(110.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, LabelColumn::None, "None");
            for i in 0..column_count {
                ui.selectable_value(selected, LabelColumn::Column(i), column_name(i));
            }
        });
    *selected != before
}

/// First rows of the table, headed by column names.
pub fn show_preview_table(ui: &mut egui::Ui, table: &Table) {
    let columns = table.column_count();
    let rows = table.row_count().min(PREVIEW_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(40.0))
        .columns(Column::auto().at_least(70.0), columns)
        .max_scroll_height(220.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for i in 0..columns {
                header.col(|ui| {
                    ui.strong(column_name(i));
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows, |mut row| {
                let cells = &table.rows()[row.index()];
                let index = row.index();
                row.col(|ui| {
                    ui.label(egui::RichText::new(index.to_string()).weak());
                });
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });

    if table.row_count() > rows {
        ui.label(egui::RichText::new(format!("{} more rows not shown", table.row_count() - rows)).weak());
    }
}
