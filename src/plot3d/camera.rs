use eframe::egui;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

const ELEVATION_LIMIT: f32 = PI / 2.0 - 0.01;
const DISTANCE_MIN: f32 = 1.5;
const DISTANCE_MAX: f32 = 20.0;

/// Orbit camera for the 3-D scatter view.
///
/// Looks at the origin of the normalized data cube `[-1, 1]^3` from a point
/// on a sphere given by azimuth, elevation and distance.
#[derive(Debug, Clone)]
pub struct OrbitalCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around the world Y axis.
    pub azimuth: f32,
    /// Radians above the XZ plane, kept short of the poles.
    pub elevation: f32,
    pub fov_y: f32,
}

impl Default for OrbitalCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 4.2,
            azimuth: PI / 4.0,
            elevation: PI / 6.0,
            fov_y: PI / 4.0,
        }
    }
}

impl OrbitalCamera {
    pub fn position(&self) -> Vec3 {
        let (sin_elev, cos_elev) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.target + Vec3::new(cos_elev * sin_az, sin_elev, cos_elev * cos_az) * self.distance
    }

    /// Projection * view, right-handed, world up = +Y.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        Mat4::perspective_rh(self.fov_y, aspect, 0.01, 100.0) * view
    }

    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(DISTANCE_MIN, DISTANCE_MAX);
    }

    /// Left-drag orbits, scroll zooms, double-click resets.
    pub fn handle_input(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.rotate(delta.x * -0.005, delta.y * 0.005);
        }

        if response.hovered() {
            let scroll = response.ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.0 {
                self.zoom((1.0_f32 - scroll * 0.001).clamp(0.5, 2.0));
            }
        }

        if response.double_clicked() {
            *self = Self::default();
        }
    }

    /// Project a world-space point into `rect`.
    ///
    /// Returns the screen position and the clip-space depth (larger is
    /// farther), or `None` for points behind the camera.
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let aspect = rect.width() / rect.height().max(1.0);
        let clip = self.view_projection(aspect) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let screen = egui::Pos2::new(
            rect.left() + (ndc_x * 0.5 + 0.5) * rect.width(),
            rect.top() + (-ndc_y * 0.5 + 0.5) * rect.height(),
        );
        Some((screen, clip.z / clip.w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0))
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let camera = OrbitalCamera::default();
        let (pos, _) = camera.project(camera.target, rect()).unwrap();
        assert!((pos.x - 200.0).abs() < 1e-3);
        assert!((pos.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn nearer_points_have_smaller_depth() {
        let camera = OrbitalCamera::default();
        let toward_eye = camera.position().normalize() * 0.5;
        let (_, near) = camera.project(toward_eye, rect()).unwrap();
        let (_, far) = camera.project(-toward_eye, rect()).unwrap();
        assert!(near < far);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let camera = OrbitalCamera::default();
        assert!(camera.project(camera.position() * 2.0, rect()).is_none());
    }

    #[test]
    fn elevation_is_clamped() {
        let mut camera = OrbitalCamera::default();
        camera.rotate(0.0, 10.0);
        assert_eq!(camera.elevation, ELEVATION_LIMIT);
        camera.zoom(1000.0);
        assert_eq!(camera.distance, DISTANCE_MAX);
    }
}
