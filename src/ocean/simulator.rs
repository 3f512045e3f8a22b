//! Fixed-capacity wave pool with ambient and interactive spawning.

use glam::Vec2;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::wave::Wave;
use crate::error::{OceanError, Result};
use crate::params::{WaterParams, WaveProfile, MAX_WAVES};

/// Spawn policy of the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Inactive slots are refilled with randomly placed waves every tick
    Ambient,
    /// Waves are only created by explicit picks on the water
    Interactive,
}

/// One of the ambient spawn regions: `x = x0 + dx·r`, `z = z0 + dz·r`, `r ∈ [0, 1)`
struct SpawnRegion {
    x: (f32, f32),
    z: (f32, f32),
}

/// Four strips hugging the domain from outside, overlapping at their ends.
/// Kept as-is rather than normalized to a symmetric tiling.
const AMBIENT_REGIONS: [SpawnRegion; 4] = [
    SpawnRegion { x: (-2.0, 1.0), z: (-1.0, 3.0) },
    SpawnRegion { x: (-1.0, 3.0), z: (1.0, 1.0) },
    SpawnRegion { x: (1.0, 1.0), z: (-2.0, 3.0) },
    SpawnRegion { x: (-2.0, 3.0), z: (-2.0, 1.0) },
];

/// Interactive spawns must land strictly inside this half-extent
const DOMAIN_HALF_EXTENT: f32 = 1.0;

/// Owns the wave pool and advances every slot once per tick
pub struct WaveSimulator {
    waves: Vec<Wave>,
    mode: SpawnMode,
    ambient: WaveProfile,
    interactive: WaveProfile,
    max_amplitude: f32,
    rng: StdRng,
}

impl WaveSimulator {
    /// Create a pool of `params.pool_size` slots.
    ///
    /// In ambient mode the pool is seeded right away with staggered starts
    /// (`now`, `now + 1`, ...) so waves arrive one after another.
    pub fn new(params: &WaterParams, mode: SpawnMode, seed: Option<u64>, now: f32) -> Result<Self> {
        if params.pool_size == 0 || params.pool_size > MAX_WAVES {
            return Err(OceanError::InvalidPoolSize {
                actual: params.pool_size,
                max: MAX_WAVES,
            });
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut simulator = Self {
            waves: vec![Wave::default(); params.pool_size],
            mode,
            ambient: params.ambient.clone(),
            interactive: params.interactive.clone(),
            max_amplitude: params.max_amplitude,
            rng,
        };

        if mode == SpawnMode::Ambient {
            simulator.seed_ambient(now);
        }

        Ok(simulator)
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn capacity(&self) -> usize {
        self.waves.len()
    }

    pub fn mode(&self) -> SpawnMode {
        self.mode
    }

    /// Number of slots holding a created or active wave
    pub fn live_count(&self) -> usize {
        self.waves.iter().filter(|w| !w.is_inactive()).count()
    }

    /// Advance every slot to time `now`.
    ///
    /// In ambient mode a slot that is inactive at the start of the tick is
    /// respawned first and advanced in the same pass.
    pub fn tick(&mut self, now: f32) {
        for slot in 0..self.waves.len() {
            if self.mode == SpawnMode::Ambient && self.waves[slot].is_inactive() {
                self.spawn_ambient(now, slot);
            }
            self.waves[slot].advance(now, self.max_amplitude);
        }
    }

    /// Spawn an ambient wave into `slot` if that slot is inactive.
    ///
    /// Picks one of the four spawn regions uniformly at random and returns
    /// whether a wave was created.
    pub fn spawn_ambient(&mut self, now: f32, slot: usize) -> bool {
        if !self.waves.get(slot).is_some_and(Wave::is_inactive) {
            return false;
        }

        let region = &AMBIENT_REGIONS[self.rng.gen_range(0..AMBIENT_REGIONS.len())];
        let x = region.x.0 + region.x.1 * self.rng.gen::<f32>();
        let z = region.z.0 + region.z.1 * self.rng.gen::<f32>();

        self.waves[slot].spawn(Vec2::new(x, z), &self.ambient, now);
        true
    }

    /// Spawn an interactive wave at the world point `(world_x, world_z)`.
    ///
    /// Uses the first inactive slot. Points outside the domain and requests
    /// against a saturated pool are dropped without touching the pool.
    pub fn spawn_interactive(&mut self, now: f32, world_x: f32, world_z: f32) -> Option<usize> {
        let inside = world_x.abs() < DOMAIN_HALF_EXTENT && world_z.abs() < DOMAIN_HALF_EXTENT;
        if !inside {
            return None;
        }

        let slot = self.waves.iter().position(Wave::is_inactive)?;
        self.waves[slot].spawn(Vec2::new(world_x, world_z), &self.interactive, now);
        debug!("Interactive wave in slot {} at ({:.3}, {:.3})", slot, world_x, world_z);

        Some(slot)
    }

    /// Switch spawn policy.
    ///
    /// Leaving ambient mode clears every slot; entering it clears and reseeds
    /// the pool with staggered starts. Setting the current mode is a no-op.
    pub fn set_mode(&mut self, interactive_only: bool, now: f32) {
        let mode = if interactive_only {
            SpawnMode::Interactive
        } else {
            SpawnMode::Ambient
        };
        if mode == self.mode {
            return;
        }

        self.mode = mode;
        self.waves.iter_mut().for_each(Wave::retire);
        if mode == SpawnMode::Ambient {
            self.seed_ambient(now);
        }

        info!("Wave spawn mode: {:?}", mode);
    }

    fn seed_ambient(&mut self, now: f32) {
        for slot in 0..self.waves.len() {
            self.spawn_ambient(now + slot as f32, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::WaveState;

    fn simulator(mode: SpawnMode, pool_size: usize) -> WaveSimulator {
        let params = WaterParams {
            pool_size,
            ..WaterParams::default()
        };
        WaveSimulator::new(&params, mode, Some(7), 0.0).unwrap()
    }

    #[test]
    fn test_rejects_empty_pool() {
        let params = WaterParams {
            pool_size: 0,
            ..WaterParams::default()
        };
        assert!(WaveSimulator::new(&params, SpawnMode::Interactive, None, 0.0).is_err());
    }

    #[test]
    fn test_ambient_seed_staggers_starts() {
        let sim = simulator(SpawnMode::Ambient, 4);

        for (slot, wave) in sim.waves().iter().enumerate() {
            assert_eq!(wave.state, WaveState::Created);
            assert_eq!(wave.start, slot as f32);
            assert_eq!(wave.speed, 0.4);
            assert_eq!(wave.length, 0.5);
            assert_eq!(wave.size, 3.5);
            assert_eq!(wave.travel, 0.1);
        }
    }

    #[test]
    fn test_ambient_centers_lie_in_regions() {
        let mut sim = simulator(SpawnMode::Interactive, 1);

        for _ in 0..500 {
            sim.waves[0].retire();
            assert!(sim.spawn_ambient(0.0, 0));

            let c = sim.waves()[0].center;
            let in_region = AMBIENT_REGIONS.iter().any(|r| {
                c.x >= r.x.0 && c.x <= r.x.0 + r.x.1 && c.y >= r.z.0 && c.y <= r.z.0 + r.z.1
            });
            assert!(in_region, "center {:?} outside every region", c);
        }
    }

    #[test]
    fn test_spawn_ambient_skips_occupied_slot() {
        let mut sim = simulator(SpawnMode::Ambient, 2);
        let before = sim.waves().to_vec();

        assert!(!sim.spawn_ambient(5.0, 1));
        assert!(!sim.spawn_ambient(5.0, 99));
        assert_eq!(sim.waves(), &before[..]);
    }

    #[test]
    fn test_interactive_uses_first_free_slot() {
        let mut sim = simulator(SpawnMode::Interactive, 3);

        assert_eq!(sim.spawn_interactive(0.0, 0.1, 0.2), Some(0));
        assert_eq!(sim.spawn_interactive(0.0, -0.5, 0.5), Some(1));

        let wave = &sim.waves()[1];
        assert_eq!(wave.center, Vec2::new(-0.5, 0.5));
        assert_eq!(wave.speed, 0.3);
        assert_eq!(wave.length, 0.4);
        assert_eq!(wave.size, 0.5);
        assert_eq!(wave.travel, 0.0);
    }

    #[test]
    fn test_interactive_rejects_points_outside_domain() {
        let mut sim = simulator(SpawnMode::Interactive, 3);

        assert_eq!(sim.spawn_interactive(0.0, 1.0, 0.0), None);
        assert_eq!(sim.spawn_interactive(0.0, 0.0, -1.5), None);
        assert_eq!(sim.live_count(), 0);
    }

    #[test]
    fn test_interactive_saturation_leaves_pool_unchanged() {
        let mut sim = simulator(SpawnMode::Interactive, 2);
        sim.spawn_interactive(0.0, 0.0, 0.0);
        sim.spawn_interactive(0.0, 0.5, 0.5);
        let before = sim.waves().to_vec();

        assert_eq!(sim.spawn_interactive(1.0, -0.5, -0.5), None);
        assert_eq!(sim.waves(), &before[..]);
    }

    #[test]
    fn test_leaving_ambient_clears_pool() {
        let mut sim = simulator(SpawnMode::Ambient, 5);
        sim.tick(2.5);
        assert!(sim.waves().iter().any(Wave::is_active));

        sim.set_mode(true, 2.5);
        assert_eq!(sim.mode(), SpawnMode::Interactive);
        assert!(sim.waves().iter().all(Wave::is_inactive));

        sim.tick(3.0);
        assert_eq!(sim.live_count(), 0);
    }

    #[test]
    fn test_entering_ambient_reseeds_pool() {
        let mut sim = simulator(SpawnMode::Interactive, 3);
        sim.spawn_interactive(0.0, 0.0, 0.0);

        sim.set_mode(false, 10.0);
        assert_eq!(sim.mode(), SpawnMode::Ambient);
        let starts: Vec<f32> = sim.waves().iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![10.0, 11.0, 12.0]);
        assert!(sim.waves().iter().all(|w| w.speed == 0.4));
    }

    #[test]
    fn test_ambient_tick_refills_retired_slots() {
        let mut sim = simulator(SpawnMode::Ambient, 1);
        let lifetime = WaveProfile::ambient().lifetime_s();

        sim.tick(0.0);
        assert!(sim.waves()[0].is_active());

        let later = lifetime + 1.0;
        sim.tick(later);
        assert!(sim.waves()[0].is_inactive());

        sim.tick(later + 0.5);
        let wave = &sim.waves()[0];
        assert!(wave.is_active());
        assert_eq!(wave.start, later + 0.5);
    }
}
