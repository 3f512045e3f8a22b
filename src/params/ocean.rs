//! Water grid, wave pool and spawn-profile parameters.

use std::f32::consts::SQRT_2;

/// Upper bound on the wave pool so the uniform array stays well under
/// the default 64 KiB uniform binding limit (16 + 32 bytes per slot).
pub const MAX_WAVES: usize = 1024;

/// Water surface and wave pool parameters
#[derive(Debug, Clone)]
pub struct WaterParams {
    /// Grid resolution N (vertices per side, also the normal/depth texture size)
    pub grid_size: usize,

    /// Wave pool capacity W (fixed number of slots)
    pub pool_size: usize,

    /// Peak wave amplitude at spawn, decays linearly to zero (world units)
    pub max_amplitude: f32,

    /// Initial height of the undisturbed surface above the bottom (world units)
    pub initial_depth: f32,

    /// Depth control range (world units)
    pub min_depth: f32,
    pub max_depth: f32,

    /// Depth change per key press (world units)
    pub depth_step: f32,

    /// Ambient spawn profile (random placement around the domain)
    pub ambient: WaveProfile,

    /// Interactive spawn profile (placed at a picked water point)
    pub interactive: WaveProfile,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            grid_size: 200,
            pool_size: 10,
            max_amplitude: 0.01,
            initial_depth: 1.0,
            min_depth: 0.2,
            max_depth: 2.0,
            depth_step: 0.05,
            ambient: WaveProfile::ambient(),
            interactive: WaveProfile::interactive(),
        }
    }
}

/// Kinematic parameters assigned to a wave at spawn time
#[derive(Debug, Clone, PartialEq)]
pub struct WaveProfile {
    /// Propagation speed of the wave front (world units per second)
    pub speed: f32,

    /// Wavelength (world units)
    pub length: f32,

    /// Packet size in wavelengths
    pub size: f32,

    /// Initial travel value before the first active tick
    pub travel_seed: f32,

    /// Crossing factor k: the front travels k·√2 before the packet leaves the domain
    pub crossing: f32,
}

impl WaveProfile {
    /// Slow, wide waves arriving from outside the domain
    pub fn ambient() -> Self {
        Self {
            speed: 0.4,
            length: 0.5,
            size: 3.5,
            travel_seed: 0.1,
            crossing: 3.0,
        }
    }

    /// Short ripple started by a click
    pub fn interactive() -> Self {
        Self {
            speed: 0.3,
            length: 0.4,
            size: 0.5,
            travel_seed: 0.0,
            crossing: 2.0,
        }
    }

    /// Active lifetime in seconds: `(k√2 + size·length) / speed`
    pub fn lifetime_s(&self) -> f32 {
        (self.crossing * SQRT_2 + self.size * self.length) / self.speed
    }
}
