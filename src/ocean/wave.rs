//! A single wave pool slot and its lifecycle.

use glam::Vec2;

use crate::params::WaveProfile;

/// Lifecycle state of a pool slot.
///
/// The discriminants are shared with `normal_depth.wgsl`, which skips every
/// slot whose state is not `Active`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveState {
    #[default]
    Inactive = 0,
    Created = 1,
    Active = 2,
}

/// Deformation source owned by one pool slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wave {
    pub state: WaveState,

    /// Origin in world XZ
    pub center: Vec2,

    /// Simulation-clock bounds of the active lifetime (seconds)
    pub start: f32,
    pub stop: f32,

    /// Distance the front has propagated since `start`
    pub travel: f32,

    /// Only meaningful while `Active`
    pub amplitude: f32,

    pub speed: f32,
    pub length: f32,
    pub size: f32,
}

impl Wave {
    /// `Inactive → Created`. Fixes the kinematic parameters and the lifetime.
    pub fn spawn(&mut self, center: Vec2, profile: &WaveProfile, start: f32) {
        self.state = WaveState::Created;
        self.center = center;
        self.speed = profile.speed;
        self.length = profile.length;
        self.size = profile.size;
        self.travel = profile.travel_seed;
        self.amplitude = 0.0;
        self.start = start;
        self.stop = start + profile.lifetime_s();
    }

    /// Advance the state machine to time `now`.
    ///
    /// A created wave whose start has been reached becomes active and is
    /// updated in the same call; an active wave past `stop` retires.
    pub fn advance(&mut self, now: f32, max_amplitude: f32) {
        if self.state == WaveState::Created && now >= self.start {
            self.state = WaveState::Active;
        }

        if self.state == WaveState::Active {
            if now <= self.stop {
                self.amplitude = (self.stop - now) / (self.stop - self.start) * max_amplitude;
                self.travel = self.speed * (now - self.start);
            } else {
                self.state = WaveState::Inactive;
            }
        }
    }

    /// Force the slot back to `Inactive`, discarding any in-flight wave
    pub fn retire(&mut self) {
        self.state = WaveState::Inactive;
    }

    pub fn is_inactive(&self) -> bool {
        self.state == WaveState::Inactive
    }

    pub fn is_active(&self) -> bool {
        self.state == WaveState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(start: f32) -> Wave {
        let mut wave = Wave::default();
        wave.spawn(Vec2::ZERO, &WaveProfile::interactive(), start);
        wave
    }

    #[test]
    fn test_spawn_sets_lifetime() {
        let wave = spawned(2.0);
        assert_eq!(wave.state, WaveState::Created);
        assert_eq!(wave.start, 2.0);
        assert_eq!(wave.stop, 2.0 + WaveProfile::interactive().lifetime_s());
        assert_eq!(wave.travel, 0.0);
    }

    #[test]
    fn test_created_waits_for_start() {
        let mut wave = spawned(3.0);
        wave.advance(2.5, 0.01);
        assert_eq!(wave.state, WaveState::Created);

        wave.advance(3.0, 0.01);
        assert_eq!(wave.state, WaveState::Active);
        assert_eq!(wave.amplitude, 0.01);
        assert_eq!(wave.travel, 0.0);
    }

    #[test]
    fn test_amplitude_decays_to_zero_at_stop() {
        let mut wave = spawned(0.0);
        let stop = wave.stop;

        let mut previous = f32::INFINITY;
        for step in 0..100 {
            let now = stop * step as f32 / 100.0;
            wave.advance(now, 0.01);
            assert!(wave.is_active());
            assert!(wave.amplitude <= previous);
            previous = wave.amplitude;
        }

        wave.advance(stop, 0.01);
        assert_eq!(wave.amplitude, 0.0);
        assert!(wave.is_active());

        wave.advance(stop + 0.001, 0.01);
        assert!(wave.is_inactive());
    }

    #[test]
    fn test_travel_follows_speed() {
        let mut wave = spawned(1.0);
        wave.advance(3.0, 0.01);
        assert!((wave.travel - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_inactive_wave_ignores_time() {
        let mut wave = Wave::default();
        wave.advance(100.0, 0.01);
        assert_eq!(wave, Wave::default());
    }
}
