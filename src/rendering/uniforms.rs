//! Uniform buffer layouts shared with the WGSL programs.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::ocean::Wave;

/// Leading block of the normal/depth uniform buffer, followed by `W` [`WaveUniform`]s
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct NormalDepthHeader {
    pub depth: f32,
    pub _padding: [f32; 3], // Array of structs starts on a 16-byte boundary
}

/// One pool slot as seen by `normal_depth.wgsl` (32 bytes, matches `struct Wave`)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WaveUniform {
    pub center: [f32; 2],
    pub amplitude: f32,
    pub speed: f32,
    pub length: f32,
    pub size: f32,
    pub travel: f32,
    pub state: u32,
}

impl From<&Wave> for WaveUniform {
    fn from(wave: &Wave) -> Self {
        Self {
            center: wave.center.to_array(),
            amplitude: wave.amplitude,
            speed: wave.speed,
            length: wave.length,
            size: wave.size,
            travel: wave.travel,
            state: wave.state as u32,
        }
    }
}

/// Size in bytes of the normal/depth uniform buffer for a pool of `pool_size` slots
pub fn normal_depth_buffer_size(pool_size: usize) -> u64 {
    (std::mem::size_of::<NormalDepthHeader>() + pool_size * std::mem::size_of::<WaveUniform>())
        as u64
}

/// Pack depth and every pool slot into `out`, replacing its contents.
///
/// Every slot is written, including inactive ones; the shader skips them by state.
/// `out` keeps its capacity, so reusing it across frames does not allocate.
pub fn pack_normal_depth(depth: f32, waves: &[Wave], out: &mut Vec<u8>) {
    let header = NormalDepthHeader {
        depth,
        _padding: [0.0; 3],
    };

    out.clear();
    out.reserve(normal_depth_buffer_size(waves.len()) as usize);
    out.extend_from_slice(bytemuck::bytes_of(&header));
    for wave in waves {
        out.extend_from_slice(bytemuck::bytes_of(&WaveUniform::from(wave)));
    }
}

/// Uniforms for the caustic pass (depth fills the vec3 padding slot)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CausticUniforms {
    pub light: [f32; 3],
    pub depth: f32,
}

impl CausticUniforms {
    pub fn new(light: Vec3, depth: f32) -> Self {
        Self {
            light: light.to_array(),
            depth,
        }
    }
}

/// Uniforms for the composite pass (bottom and water draws)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _padding0: f32,
    pub light: [f32; 3],
    pub _padding1: f32,
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4, eye: Vec3, light: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.to_array(),
            _padding0: 0.0,
            light: light.to_array(),
            _padding1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::WaveState;
    use glam::Vec2;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<NormalDepthHeader>(), 16);
        assert_eq!(std::mem::size_of::<WaveUniform>(), 32);
        assert_eq!(std::mem::size_of::<CausticUniforms>(), 16);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 96);
        assert_eq!(normal_depth_buffer_size(10), 16 + 320);
    }

    #[test]
    fn test_pack_writes_every_slot() {
        let active = Wave {
            state: WaveState::Active,
            center: Vec2::new(0.25, -0.5),
            amplitude: 0.005,
            speed: 0.3,
            length: 0.4,
            size: 0.5,
            travel: 1.5,
            ..Wave::default()
        };
        let waves = vec![Wave::default(), active];

        let mut bytes = Vec::new();
        pack_normal_depth(1.25, &waves, &mut bytes);
        assert_eq!(bytes.len() as u64, normal_depth_buffer_size(2));

        let header: NormalDepthHeader = bytemuck::pod_read_unaligned(&bytes[..16]);
        assert_eq!(header.depth, 1.25);

        let slots: Vec<WaveUniform> = bytes[16..]
            .chunks_exact(32)
            .map(bytemuck::pod_read_unaligned)
            .collect();
        assert_eq!(slots[0].state, WaveState::Inactive as u32);
        assert_eq!(slots[1].state, 2);
        assert_eq!(slots[1].center, [0.25, -0.5]);
        assert_eq!(slots[1].travel, 1.5);
    }

    #[test]
    fn test_pack_reuses_buffer() {
        let waves = vec![Wave::default(); 10];
        let mut bytes = Vec::new();

        pack_normal_depth(1.0, &waves, &mut bytes);
        let capacity = bytes.capacity();
        let ptr = bytes.as_ptr();

        for frame in 0..5 {
            pack_normal_depth(frame as f32, &waves, &mut bytes);
            assert_eq!(bytes.len() as u64, normal_depth_buffer_size(10));
            assert_eq!(bytes.capacity(), capacity);
            assert_eq!(bytes.as_ptr(), ptr);
        }

        let header: NormalDepthHeader = bytemuck::pod_read_unaligned(&bytes[..16]);
        assert_eq!(header.depth, 4.0);
    }
}
