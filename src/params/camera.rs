//! Orbit camera configuration.

use std::f32::consts::FRAC_PI_4;

/// Orbit camera parameters (spherical coordinates around the origin)
#[derive(Debug, Clone)]
pub struct OrbitCameraParams {
    /// Initial distance from the origin (world units)
    pub distance: f32,

    /// Initial azimuth (radians)
    pub horizontal: f32,

    /// Initial elevation above the XZ plane (radians)
    pub vertical: f32,

    /// Zoom limits (world units)
    pub min_distance: f32,
    pub max_distance: f32,

    /// Elevation limit, keeps the camera off the poles where Y-up degenerates (radians)
    pub max_elevation: f32,

    /// Distance change per scroll line (world units)
    pub zoom_step: f32,
}

impl Default for OrbitCameraParams {
    fn default() -> Self {
        Self {
            distance: 5.0,
            horizontal: -FRAC_PI_4,
            vertical: FRAC_PI_4,
            min_distance: 2.0,
            max_distance: 20.0,
            max_elevation: 1.5,
            zoom_step: 0.5,
        }
    }
}
