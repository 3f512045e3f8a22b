//! High-level ocean system: water grid, depth and wave pool.

use log::info;

use super::mesh::WaterMesh;
use super::simulator::{SpawnMode, WaveSimulator};
use crate::error::Result;
use crate::params::WaterParams;

/// Simulation state consumed by the renderer.
///
/// The renderer only reads from it; all mutation happens in
/// [`OceanSystem::advance_frame`] and the input hooks before rendering.
pub struct OceanSystem {
    pub mesh: WaterMesh,
    pub simulator: WaveSimulator,
    pub params: WaterParams,
    depth: f32,
}

impl OceanSystem {
    /// Create new ocean system with specified parameters
    pub fn new(params: WaterParams, mode: SpawnMode, seed: Option<u64>, now: f32) -> Result<Self> {
        let mesh = WaterMesh::build(params.grid_size)?;
        let simulator = WaveSimulator::new(&params, mode, seed, now)?;

        info!(
            "Water grid {}x{} ({} indices), {} wave slots, {:?} mode",
            params.grid_size,
            params.grid_size,
            mesh.indices.len(),
            simulator.capacity(),
            mode
        );

        Ok(Self {
            mesh,
            simulator,
            depth: params.initial_depth,
            params,
        })
    }

    /// Advance the simulation by one frame (must run before rendering it)
    pub fn advance_frame(&mut self, now: f32) {
        self.simulator.tick(now);
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Set the surface height; the value is used as given
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    /// Step the depth by `steps` increments within the configured range
    pub fn nudge_depth(&mut self, steps: f32) {
        self.depth = (self.depth + steps * self.params.depth_step)
            .clamp(self.params.min_depth, self.params.max_depth);
    }

    /// Spawn an interactive wave at a picked water point (ignored in ambient mode)
    pub fn interact(&mut self, now: f32, world_x: f32, world_z: f32) -> Option<usize> {
        if self.simulator.mode() != SpawnMode::Interactive {
            return None;
        }
        self.simulator.spawn_interactive(now, world_x, world_z)
    }

    /// Flip between ambient and interactive spawning
    pub fn toggle_mode(&mut self, now: f32) {
        let interactive_only = self.simulator.mode() == SpawnMode::Ambient;
        self.simulator.set_mode(interactive_only, now);
    }
}
