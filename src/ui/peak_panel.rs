use crate::data::table::column_name;
use crate::processing::peaks::{MAX_HALF_WIDTH, MIN_HALF_WIDTH};
use crate::state::panel_state::{PanelId, PeakPanelState, PeakTrace};
use crate::state::theme::Theme;
use crate::ui::column_pickers::{self, column_combo};
use crate::ui::ingest_controls::{show_ingest_controls, IngestAction};
use crate::ui::plot_canvas::{self, PlotArea};

const MARKER_SIZE: f32 = 6.0;

pub fn show_peak_panel(
    ui: &mut egui::Ui,
    id: PanelId,
    panel: &mut PeakPanelState,
    theme: &Theme,
    plot_height: f32,
) -> IngestAction {
    let action = show_ingest_controls(ui, id, panel);
    ui.add_space(4.0);

    let columns = panel.upload.as_ref().map_or(0, |u| u.table.column_count());
    let settings = &mut panel.settings;
    ui.horizontal(|ui| {
        column_combo(ui, ("peak_x", id), "X", &mut settings.x_column, columns);
        column_combo(ui, ("peak_y", id), "Y", &mut settings.y_column, columns);
        ui.separator();
        ui.label("Half-width");
        ui.add(egui::Slider::new(&mut settings.half_width, MIN_HALF_WIDTH..=MAX_HALF_WIDTH));
    });
    panel.refresh();

    ui.add_space(6.0);
    if panel.trace.is_some() {
        show_trace_plot(ui, id, panel, theme, plot_height);
        ui.add_space(6.0);
    }
    match &panel.trace {
        Some(trace) => show_extrema_lists(ui, trace),
        None => plot_canvas::show_empty_hint(ui),
    }

    if let Some(upload) = &panel.upload {
        egui::CollapsingHeader::new("Data preview")
            .id_salt(("preview", id))
            .show(ui, |ui| column_pickers::show_preview_table(ui, &upload.table));
    }

    action
}

fn show_trace_plot(ui: &mut egui::Ui, id: PanelId, panel: &mut PeakPanelState, theme: &Theme, plot_height: f32) {
    let Some(trace) = &panel.trace else {
        return;
    };

    if panel.view.auto_fit {
        panel.view.fit_to_points(&trace.x, &trace.y);
        panel.view.auto_fit = false;
    }

    let area: PlotArea = plot_canvas::allocate_plot(ui, plot_height);
    let response = ui.interact(area.plot, egui::Id::new("peak_plot").with(id), egui::Sense::click_and_drag());
    panel.view.handle_input(&response, area.plot);

    let painter = ui.painter_at(area.total);
    let x_title = column_name(panel.settings.x_column);
    let y_title = column_name(panel.settings.y_column);
    plot_canvas::draw_frame(&painter, &panel.view, area, theme, &x_title, &y_title);
    let clipped = painter.with_clip_rect(area.plot);

    // Break the line wherever a point is not drawable.
    let mut segment: Vec<egui::Pos2> = Vec::new();
    let stroke = egui::Stroke::new(1.5, theme.trace_color());
    for (&x, &y) in trace.x.iter().zip(&trace.y) {
        if x.is_finite() && y.is_finite() {
            segment.push(panel.view.data_to_screen(x, y, area.plot));
        } else if !segment.is_empty() {
            clipped.add(egui::Shape::line(std::mem::take(&mut segment), stroke));
        }
    }
    if !segment.is_empty() {
        clipped.add(egui::Shape::line(segment, stroke));
    }

    let extrema = &trace.report.extrema;
    for &i in &extrema.maxima {
        let at = panel.view.data_to_screen(trace.x[i], trace.y[i], area.plot);
        clipped.add(triangle(at, true, theme.maximum_color()));
    }
    for &i in &extrema.minima {
        let at = panel.view.data_to_screen(trace.x[i], trace.y[i], area.plot);
        clipped.add(triangle(at, false, theme.minimum_color()));
    }
}

/// Filled triangle marker pointing up for maxima and down for minima.
fn triangle(at: egui::Pos2, up: bool, color: egui::Color32) -> egui::Shape {
    let s = MARKER_SIZE;
    let points = if up {
        vec![
            egui::pos2(at.x, at.y - s),
            egui::pos2(at.x + s, at.y + s * 0.7),
            egui::pos2(at.x - s, at.y + s * 0.7),
        ]
    } else {
        vec![
            egui::pos2(at.x, at.y + s),
            egui::pos2(at.x - s, at.y - s * 0.7),
            egui::pos2(at.x + s, at.y - s * 0.7),
        ]
    };
    egui::Shape::convex_polygon(points, color, egui::Stroke::NONE)
}

fn show_extrema_lists(ui: &mut egui::Ui, trace: &PeakTrace) {
    ui.columns(2, |cols| {
        for (ui, (title, values)) in cols.iter_mut().zip([
            ("Maxima", &trace.report.maxima_x),
            ("Minima", &trace.report.minima_x),
        ]) {
            ui.label(egui::RichText::new(format!("{title} ({})", values.len())).strong());
            egui::ScrollArea::vertical()
                .id_salt(title)
                .max_height(120.0)
                .show(ui, |ui| {
                    if values.is_empty() {
                        ui.label(egui::RichText::new("none").weak());
                    } else {
                        ui.label(egui::RichText::new(values.join(", ")).monospace());
                    }
                });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_point_the_right_way() {
        let at = egui::pos2(10.0, 10.0);
        let egui::Shape::Path(up) = triangle(at, true, egui::Color32::RED) else {
            panic!("expected a path");
        };
        assert!(up.points[0].y < at.y);
        let egui::Shape::Path(down) = triangle(at, false, egui::Color32::RED) else {
            panic!("expected a path");
        };
        assert!(down.points[0].y > at.y);
    }
}
