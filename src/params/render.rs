//! Rendering and export configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Side of the square caustic accumulation texture (pixels)
    pub caustic_texture_size: u32,

    /// Direction light travels in (pointing down into the water)
    pub light_direction: [f32; 3],

    /// Side of the generated bottom texture when no image is supplied (pixels)
    pub procedural_bottom_size: u32,

    /// Still-image export target
    pub export_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 30.0,
            near_plane: 1.0,
            far_plane: 100.0,
            caustic_texture_size: 1024,
            light_direction: [0.3, -1.0, 0.2],
            procedural_bottom_size: 256,
            export_path: PathBuf::from("scene.png"),
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// Normalized light direction
    pub fn light(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.light_direction).normalize_or(glam::Vec3::NEG_Y)
    }
}
