use glam::Vec3;

use crate::plot3d::camera::OrbitalCamera;
use crate::render::plot_interaction::{self, finite_range};
use crate::processing::selection::ScatterData;
use crate::state::palette::ColorPalette;
use crate::state::panel_state::{PanelId, ScatterPanelState};
use crate::state::plot_settings::{OPACITY_CHOICES, SIZE_CHOICES};
use crate::state::theme::Theme;
use crate::ui::column_pickers::{self, column_combo, label_combo};
use crate::ui::ingest_controls::{show_ingest_controls, IngestAction};
use crate::ui::plot_canvas::{self, PlotArea};

/// Pointer must be this close (in points) to a marker to show its tooltip.
const HOVER_RADIUS: f32 = 12.0;

/// Draw a 2D or 3D scatter panel: controls, plot and data preview.
pub fn show_scatter_panel(
    ui: &mut egui::Ui,
    id: PanelId,
    panel: &mut ScatterPanelState,
    theme: &Theme,
    plot_height: f32,
) -> IngestAction {
    let action = show_ingest_controls(ui, id, panel);
    ui.add_space(4.0);

    show_axis_controls(ui, id, panel);
    show_style_controls(ui, id, panel);
    panel.refresh();

    ui.add_space(6.0);
    if panel.data.as_ref().map_or(true, ScatterData::is_empty) {
        plot_canvas::show_empty_hint(ui);
    } else if panel.is_spatial() {
        show_spatial_plot(ui, id, panel, theme, plot_height);
    } else {
        show_planar_plot(ui, id, panel, theme, plot_height);
    }

    if let Some(data) = &panel.data {
        ui.label(
            egui::RichText::new(format!(
                "{} of {} rows plotted, {} label classes",
                data.plotted_count(),
                data.len(),
                data.labels.class_count()
            ))
            .weak(),
        );
    }

    if let Some(upload) = &panel.upload {
        egui::CollapsingHeader::new("Data preview")
            .id_salt(("preview", id))
            .show(ui, |ui| column_pickers::show_preview_table(ui, &upload.table));
    }

    action
}

fn show_axis_controls(ui: &mut egui::Ui, id: PanelId, panel: &mut ScatterPanelState) {
    let columns = panel.upload.as_ref().map_or(0, |u| u.table.column_count());
    let axes = &mut panel.settings.axes;
    ui.horizontal(|ui| {
        column_combo(ui, ("x_col", id), "X", &mut axes.x, columns);
        column_combo(ui, ("y_col", id), "Y", &mut axes.y, columns);
        if let Some(z) = axes.z.as_mut() {
            column_combo(ui, ("z_col", id), "Z", z, columns);
        }
        label_combo(ui, ("label_col", id), &mut axes.label, columns);
    });
}

fn show_style_controls(ui: &mut egui::Ui, id: PanelId, panel: &mut ScatterPanelState) {
    let settings = &mut panel.settings;
    ui.horizontal(|ui| {
        ui.label("Colors");
        egui::ComboBox::from_id_salt(("palette", id))
            .selected_text(settings.palette.label())
            .width(100.0)
            .show_ui(ui, |ui| {
                for palette in ColorPalette::ALL {
                    ui.selectable_value(&mut settings.palette, palette, palette.label());
                }
            });

        ui.label("Opacity");
        egui::ComboBox::from_id_salt(("opacity", id))
            .selected_text(format!("{:.1}", settings.opacity))
            .width(60.0)
            .show_ui(ui, |ui| {
                for opacity in OPACITY_CHOICES {
                    ui.selectable_value(&mut settings.opacity, opacity, format!("{opacity:.1}"));
                }
            });

        ui.label("Size");
        egui::ComboBox::from_id_salt(("marker_size", id))
            .selected_text(format!("{}", settings.marker_size))
            .width(60.0)
            .show_ui(ui, |ui| {
                for size in SIZE_CHOICES {
                    ui.selectable_value(&mut settings.marker_size, size, format!("{size}"));
                }
            });
    });

    ui.horizontal(|ui| {
        ui.label("X title");
        ui.add(egui::TextEdit::singleline(&mut settings.x_title).desired_width(120.0));
        ui.label("Y title");
        ui.add(egui::TextEdit::singleline(&mut settings.y_title).desired_width(120.0));
        if settings.axes.z.is_some() {
            ui.label("Z title");
            ui.add(egui::TextEdit::singleline(&mut settings.z_title).desired_width(120.0));
        }
    });
}

fn marker_color(panel: &ScatterPanelState, row: usize) -> egui::Color32 {
    let Some(data) = &panel.data else {
        return egui::Color32::GRAY;
    };
    let t = data.labels.codes.get(row).map_or(0.0, |&c| data.labels.normalized(c));
    panel.settings.palette.color32(t, panel.settings.opacity)
}

fn show_planar_plot(
    ui: &mut egui::Ui,
    id: PanelId,
    panel: &mut ScatterPanelState,
    theme: &Theme,
    plot_height: f32,
) {
    let Some(data) = &panel.data else {
        return;
    };

    if panel.view.auto_fit {
        panel.view.fit_to_points(&data.x, &data.y);
        panel.view.auto_fit = false;
    }

    let area: PlotArea = plot_canvas::allocate_plot(ui, plot_height);
    let response = ui.interact(area.plot, egui::Id::new("scatter_plot").with(id), egui::Sense::click_and_drag());
    panel.view.handle_input(&response, area.plot);

    let painter = ui.painter_at(area.total);
    let settings = &panel.settings;
    plot_canvas::draw_frame(&painter, &panel.view, area, theme, &settings.x_title, &settings.y_title);

    let points = painter.with_clip_rect(area.plot);
    let radius = settings.marker_size * 0.5;
    for (row, (&x, &y)) in data.x.iter().zip(&data.y).enumerate() {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let pos = panel.view.data_to_screen(x, y, area.plot);
        points.circle_filled(pos, radius, marker_color(panel, row));
    }

    let (Some(pointer), Some(tree)) = (response.hover_pos(), &panel.hover) else {
        return;
    };
    let (qx, qy) = panel.view.screen_to_data(pointer, area.plot);
    let row = tree.nearest(qx, qy);
    let at = panel.view.data_to_screen(data.x[row], data.y[row], area.plot);
    if at.distance(pointer) <= HOVER_RADIUS.max(radius) {
        let text = format!(
            "{}\nx: {}\ny: {}",
            data.label_text[row],
            plot_interaction::format_tick_value(data.x[row]),
            plot_interaction::format_tick_value(data.y[row]),
        );
        let accent = marker_color(panel, row).to_opaque();
        plot_canvas::draw_tooltip(&points, at, text, accent);
    }
}

/// Map each axis onto [-1, 1]; degenerate axes collapse to 0.
struct CubeScale {
    min: [f64; 3],
    max: [f64; 3],
}

impl CubeScale {
    fn new(x: &[f64], y: &[f64], z: &[f64]) -> Self {
        let mut min = [0.0; 3];
        let mut max = [1.0; 3];
        for (axis, values) in [x, y, z].into_iter().enumerate() {
            if let Some((lo, hi)) = finite_range(values) {
                min[axis] = lo;
                max[axis] = hi;
            }
        }
        Self { min, max }
    }

    fn unit(&self, axis: usize, v: f64) -> f32 {
        let span = self.max[axis] - self.min[axis];
        if span.abs() < 1e-15 {
            0.0
        } else {
            (2.0 * (v - self.min[axis]) / span - 1.0) as f32
        }
    }

    fn value_at(&self, axis: usize, t: f64) -> f64 {
        self.min[axis] + t * (self.max[axis] - self.min[axis])
    }
}

/// Data axes (x, y, z) to world space with data z pointing up.
fn to_world(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, z, -y)
}

fn show_spatial_plot(
    ui: &mut egui::Ui,
    id: PanelId,
    panel: &mut ScatterPanelState,
    theme: &Theme,
    plot_height: f32,
) {
    let Some(data) = &panel.data else {
        return;
    };
    let Some(z) = &data.z else {
        return;
    };

    let rect = ui
        .allocate_space(egui::Vec2::new(ui.available_width(), plot_height.max(200.0)))
        .1;
    let response = ui.interact(rect, egui::Id::new("scatter_3d").with(id), egui::Sense::click_and_drag());
    panel.camera.handle_input(&response);

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.plot_bg());

    let scale = CubeScale::new(&data.x, &data.y, z);
    let camera = &panel.camera;

    draw_cube(&painter, camera, rect);

    let mut projected: Vec<(egui::Pos2, f32, usize)> = data
        .x
        .iter()
        .zip(&data.y)
        .zip(z)
        .enumerate()
        .filter(|(_, ((x, y), z))| x.is_finite() && y.is_finite() && z.is_finite())
        .filter_map(|(row, ((&x, &y), &z))| {
            let world = to_world(scale.unit(0, x), scale.unit(1, y), scale.unit(2, z));
            camera.project(world, rect).map(|(pos, depth)| (pos, depth, row))
        })
        .collect();
    // Back to front.
    projected.sort_by(|a, b| b.1.total_cmp(&a.1));

    let radius = panel.settings.marker_size * 0.5;
    for (pos, _, row) in projected {
        painter.circle_filled(pos, radius, marker_color(panel, row));
    }

    draw_cube_labels(&painter, panel, rect, &scale);
}

const CUBE_EDGES: [([f32; 3], [f32; 3]); 12] = [
    ([-1.0, -1.0, -1.0], [1.0, -1.0, -1.0]),
    ([-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]),
    ([-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]),
    ([-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0]),
    ([1.0, -1.0, -1.0], [1.0, 1.0, -1.0]),
    ([-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0]),
    ([1.0, -1.0, 1.0], [1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]),
    ([1.0, -1.0, -1.0], [1.0, -1.0, 1.0]),
    ([-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]),
    ([1.0, 1.0, -1.0], [1.0, 1.0, 1.0]),
];

fn draw_cube(painter: &egui::Painter, camera: &OrbitalCamera, rect: egui::Rect) {
    let stroke = egui::Stroke::new(1.0, painter.ctx().style().visuals.text_color().gamma_multiply(0.35));
    for (a, b) in CUBE_EDGES {
        let pa = camera.project(to_world(a[0], a[1], a[2]), rect);
        let pb = camera.project(to_world(b[0], b[1], b[2]), rect);
        if let (Some((pa, _)), Some((pb, _))) = (pa, pb) {
            painter.line_segment([pa, pb], stroke);
        }
    }
}

fn draw_cube_labels(painter: &egui::Painter, panel: &ScatterPanelState, rect: egui::Rect, scale: &CubeScale) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.7);
    let font = egui::FontId::proportional(10.0);
    let title_font = egui::FontId::proportional(12.0);
    let camera = &panel.camera;
    let settings = &panel.settings;

    let titles = [
        (&settings.x_title, [0.0, -1.25, -1.25]),
        (&settings.y_title, [-1.25, 0.0, -1.25]),
        (&settings.z_title, [-1.25, -1.25, 0.0]),
    ];
    for (title, p) in titles {
        if let Some((pos, _)) = camera.project(to_world(p[0], p[1], p[2]), rect) {
            if rect.contains(pos) {
                painter.text(pos, egui::Align2::CENTER_CENTER, title, title_font.clone(), text_color);
            }
        }
    }

    for i in 0..=4 {
        let t = i as f64 / 4.0;
        let u = (-1.0 + 2.0 * t) as f32;
        let ticks = [
            (0, [u, -1.0, -1.1]),
            (1, [-1.1, u, -1.0]),
            (2, [-1.1, -1.0, u]),
        ];
        for (axis, p) in ticks {
            if let Some((pos, _)) = camera.project(to_world(p[0], p[1], p[2]), rect) {
                if rect.contains(pos) {
                    painter.text(
                        pos,
                        egui::Align2::RIGHT_CENTER,
                        plot_interaction::format_tick_value(scale.value_at(axis, t)),
                        font.clone(),
                        dim_color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_scale_maps_extremes_to_unit_bounds() {
        let scale = CubeScale::new(&[0.0, 10.0], &[5.0, 5.0], &[f64::NAN, 2.0]);
        assert_eq!(scale.unit(0, 0.0), -1.0);
        assert_eq!(scale.unit(0, 10.0), 1.0);
        assert_eq!(scale.unit(0, 5.0), 0.0);
        // Constant axis sits in the middle.
        assert_eq!(scale.unit(1, 5.0), 0.0);
        assert_eq!(scale.value_at(0, 0.5), 5.0);
    }

    #[test]
    fn data_z_points_up() {
        assert_eq!(to_world(0.0, 0.0, 1.0), Vec3::Y);
    }
}
