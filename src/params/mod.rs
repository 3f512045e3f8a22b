//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (world units, seconds, radians, pixels)
//! - Documented ranges and meanings
//! - Defaults matching the reference scene

mod camera;
mod ocean;
mod render;

// Re-export all types
pub use camera::OrbitCameraParams;
pub use ocean::{WaterParams, WaveProfile, MAX_WAVES};
pub use render::RenderConfig;
