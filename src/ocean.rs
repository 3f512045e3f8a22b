//! Water surface simulation: static grid plus a pool of transient waves.

mod mesh;
mod simulator;
mod system;
mod wave;

// Re-export public types
pub use mesh::{GridVertex, WaterMesh};
pub use simulator::{SpawnMode, WaveSimulator};
pub use system::OceanSystem;
pub use wave::{Wave, WaveState};
