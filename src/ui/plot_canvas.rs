use crate::render::plot_interaction::{self, PlotViewState};
use crate::state::theme::Theme;

const LEFT_MARGIN: f32 = 70.0;
const RIGHT_MARGIN: f32 = 20.0;
const BOTTOM_MARGIN: f32 = 40.0;
const TOP_MARGIN: f32 = 10.0;

/// Screen areas of one 2D plot: the whole allocation and the inner data area.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub total: egui::Rect,
    pub plot: egui::Rect,
}

/// Reserve a full-width plot of the given height, leaving room for tick labels.
pub fn allocate_plot(ui: &mut egui::Ui, height: f32) -> PlotArea {
    let plot_height = (height - BOTTOM_MARGIN - TOP_MARGIN).max(100.0);
    let total_height = plot_height + BOTTOM_MARGIN + TOP_MARGIN;
    let total = ui
        .allocate_space(egui::Vec2::new(ui.available_width(), total_height))
        .1;
    let plot = egui::Rect::from_min_max(
        egui::Pos2::new(total.left() + LEFT_MARGIN, total.top() + TOP_MARGIN),
        egui::Pos2::new(total.right() - RIGHT_MARGIN, total.bottom() - BOTTOM_MARGIN),
    );
    PlotArea { total, plot }
}

/// Background, grid, border, ticks and axis titles.
pub fn draw_frame(
    painter: &egui::Painter,
    view: &PlotViewState,
    area: PlotArea,
    theme: &Theme,
    x_title: &str,
    y_title: &str,
) {
    let PlotArea { total, plot } = area;
    painter.rect_filled(plot, 0.0, theme.plot_bg());

    let grid = theme.grid_color();
    let x_grid = plot_interaction::compute_grid_lines(view.x_min, view.x_max);
    let y_grid = plot_interaction::compute_grid_lines(view.y_min, view.y_max);

    for &(xv, is_major) in &x_grid {
        let sx = view.data_to_screen(xv, view.y_min, plot).x;
        let width = if is_major { 1.0 } else { 0.5 };
        painter.line_segment(
            [egui::pos2(sx, plot.top()), egui::pos2(sx, plot.bottom())],
            egui::Stroke::new(width, grid),
        );
    }
    for &(yv, is_major) in &y_grid {
        let sy = view.data_to_screen(view.x_min, yv, plot).y;
        let width = if is_major { 1.0 } else { 0.5 };
        painter.line_segment(
            [egui::pos2(plot.left(), sy), egui::pos2(plot.right(), sy)],
            egui::Stroke::new(width, grid),
        );
    }

    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.6);
    painter.rect_stroke(plot, 0.0, egui::Stroke::new(1.0, dim_color), egui::StrokeKind::Outside);

    for &(xv, _) in x_grid.iter().filter(|(_, major)| *major) {
        let sx = view.data_to_screen(xv, view.y_min, plot).x;
        painter.text(
            egui::Pos2::new(sx, plot.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            plot_interaction::format_tick_value(xv),
            egui::FontId::proportional(10.0),
            dim_color,
        );
    }
    for &(yv, _) in y_grid.iter().filter(|(_, major)| *major) {
        let sy = view.data_to_screen(view.x_min, yv, plot).y;
        painter.text(
            egui::Pos2::new(plot.left() - 4.0, sy),
            egui::Align2::RIGHT_CENTER,
            plot_interaction::format_tick_value(yv),
            egui::FontId::proportional(10.0),
            dim_color,
        );
    }

    painter.text(
        egui::Pos2::new(plot.center().x, total.bottom() - 4.0),
        egui::Align2::CENTER_BOTTOM,
        x_title,
        egui::FontId::proportional(12.0),
        text_color,
    );
    painter.text(
        egui::Pos2::new(total.left() + 2.0, plot.center().y),
        egui::Align2::LEFT_CENTER,
        y_title,
        egui::FontId::proportional(11.0),
        text_color,
    );
}

/// Highlight a point and show `text` next to it.
pub fn draw_tooltip(painter: &egui::Painter, at: egui::Pos2, text: String, accent: egui::Color32) {
    painter.circle_filled(at, 5.0, accent);
    painter.circle_stroke(at, 5.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

    let font = egui::FontId::proportional(11.0);
    let text_color = painter.ctx().style().visuals.text_color();
    let galley = painter.layout_no_wrap(text, font, text_color);

    // Flip to the left of the cursor near the right edge.
    let clip = painter.clip_rect();
    let mut pos = egui::Pos2::new(at.x + 10.0, at.y - galley.size().y - 6.0);
    if pos.x + galley.size().x > clip.right() {
        pos.x = at.x - galley.size().x - 10.0;
    }
    if pos.y < clip.top() {
        pos.y = at.y + 6.0;
    }

    let bg_rect = egui::Rect::from_min_size(pos, galley.size()).expand2(egui::vec2(4.0, 2.0));
    let bg_color = painter.ctx().style().visuals.window_fill;
    painter.rect_filled(bg_rect, 3.0, bg_color.gamma_multiply(0.9));
    painter.rect_stroke(bg_rect, 3.0, egui::Stroke::new(0.5, accent), egui::StrokeKind::Outside);
    painter.galley(pos, galley, text_color);
}

/// Placeholder shown before anything is uploaded.
pub fn show_empty_hint(ui: &mut egui::Ui) {
    ui.add_space(30.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new("No data loaded").strong().size(16.0));
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new("Select a file, paste a data URI, or drop a file onto this panel.")
                .weak(),
        );
    });
    ui.add_space(30.0);
}
