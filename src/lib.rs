//! Causticsea library - wave pool ocean with GPU caustics

pub mod bottom;
pub mod camera;
pub mod cli;
pub mod error;
pub mod ocean;
pub mod params;
pub mod rendering;
