//! Orbit camera around the water domain, with ray picking on the water plane.

use glam::{Mat4, Vec2, Vec3};

use crate::params::{OrbitCameraParams, RenderConfig};

/// Camera orbiting the origin on a sphere
pub struct OrbitCamera {
    pub horizontal: f32,
    pub vertical: f32,
    pub distance: f32,
    params: OrbitCameraParams,
}

impl OrbitCamera {
    /// Create new camera at the configured starting angles
    pub fn new(params: OrbitCameraParams) -> Self {
        Self {
            horizontal: params.horizontal,
            vertical: params.vertical.clamp(-params.max_elevation, params.max_elevation),
            distance: params.distance.clamp(params.min_distance, params.max_distance),
            params,
        }
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        let ground = self.distance * self.vertical.cos();
        Vec3::new(
            ground * self.horizontal.sin(),
            self.distance * self.vertical.sin(),
            ground * self.horizontal.cos(),
        )
    }

    /// Rotate by a pointer drag; a drag across the whole window turns by π
    pub fn orbit(&mut self, dx_px: f32, dy_px: f32, width: f32, height: f32) {
        self.horizontal -= dx_px / width.max(1.0) * std::f32::consts::PI;
        self.vertical = (self.vertical + dy_px / height.max(1.0) * std::f32::consts::PI)
            .clamp(-self.params.max_elevation, self.params.max_elevation);
    }

    /// Move towards (negative lines) or away from (positive lines) the origin
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance + lines * self.params.zoom_step)
            .clamp(self.params.min_distance, self.params.max_distance);
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.position();
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }

    /// Intersect the pointer ray with the water plane `y = depth`.
    ///
    /// `cursor` is in window pixels with the origin at the top-left corner.
    /// Returns the hit point in world XZ, or `None` when the ray runs parallel
    /// to or away from the plane. Domain bounds are left to the caller.
    pub fn pick_water(&self, cursor: Vec2, depth: f32, render_config: &RenderConfig) -> Option<Vec2> {
        let width = render_config.window_width.max(1) as f32;
        let height = render_config.window_height.max(1) as f32;
        let ndc_x = cursor.x / width * 2.0 - 1.0;
        let ndc_y = 1.0 - cursor.y / height * 2.0;

        let (view_proj, _) = self.view_proj(render_config);
        let inverse = view_proj.inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        let ray = far - near;
        if ray.y.abs() < f32::EPSILON {
            return None;
        }

        let t = (depth - near.y) / ray.y;
        if t < 0.0 {
            return None;
        }

        let hit = near + ray * t;
        Some(Vec2::new(hit.x, hit.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_cursor(config: &RenderConfig) -> Vec2 {
        Vec2::new(
            config.window_width as f32 / 2.0,
            config.window_height as f32 / 2.0,
        )
    }

    #[test]
    fn test_default_position() {
        let camera = OrbitCamera::new(OrbitCameraParams::default());
        let eye = camera.position();

        assert!((eye.length() - 5.0).abs() < 1e-4);
        assert!(eye.y > 0.0);
        assert!(eye.x < 0.0 && eye.z > 0.0);
    }

    #[test]
    fn test_orbit_clamps_elevation() {
        let params = OrbitCameraParams::default();
        let mut camera = OrbitCamera::new(params.clone());

        camera.orbit(0.0, 10_000.0, 100.0, 100.0);
        assert_eq!(camera.vertical, params.max_elevation);
        camera.orbit(0.0, -10_000.0, 100.0, 100.0);
        assert_eq!(camera.vertical, -params.max_elevation);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let params = OrbitCameraParams::default();
        let mut camera = OrbitCamera::new(params.clone());

        camera.zoom(1000.0);
        assert_eq!(camera.distance, params.max_distance);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, params.min_distance);
    }

    #[test]
    fn test_pick_center_hits_origin() {
        let camera = OrbitCamera::new(OrbitCameraParams::default());
        let config = RenderConfig::default();

        let hit = camera
            .pick_water(centered_cursor(&config), 0.0, &config)
            .unwrap();
        assert!(hit.length() < 1e-3, "hit {:?}", hit);
    }

    #[test]
    fn test_pick_lands_on_plane() {
        let camera = OrbitCamera::new(OrbitCameraParams::default());
        let config = RenderConfig::default();
        let depth = 1.0;

        let hit = camera
            .pick_water(Vec2::new(500.0, 300.0), depth, &config)
            .unwrap();

        let (view_proj, _) = camera.view_proj(&config);
        let clip = view_proj.project_point3(Vec3::new(hit.x, depth, hit.y));
        let px = (clip.x + 1.0) / 2.0 * config.window_width as f32;
        let py = (1.0 - clip.y) / 2.0 * config.window_height as f32;
        assert!((px - 500.0).abs() < 0.5 && (py - 300.0).abs() < 0.5);
    }

    #[test]
    fn test_pick_misses_plane_above_camera() {
        let camera = OrbitCamera::new(OrbitCameraParams::default());
        let config = RenderConfig::default();

        assert!(camera
            .pick_water(centered_cursor(&config), 50.0, &config)
            .is_none());
    }
}
