//! Error types for setup, asset loading and export.
//!
//! Everything here is either fatal at startup (GPU capability, shader and
//! pipeline failures) or a programmer-contract violation (malformed grid or
//! pool sizes). A saturated wave pool is not an error and never shows up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OceanError {
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to find suitable GPU adapter")]
    Adapter,

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Shader '{name}' failed to compile:\n{log}")]
    ShaderCompile { name: String, log: String },

    #[error("Pipeline '{name}' failed to link:\n{log}")]
    PipelineCreation { name: String, log: String },

    #[error("Render target '{name}' is incomplete: {reason}")]
    IncompleteTarget { name: String, reason: String },

    #[error("Grid resolution must be in 2..=65536, got {0}")]
    InvalidGridSize(usize),

    #[error("Wave pool size must be in 1..={max}, got {actual}")]
    InvalidPoolSize { actual: usize, max: usize },

    #[error("Frame readback failed: {0}")]
    Readback(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OceanError>;
