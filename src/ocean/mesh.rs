//! Static water grid: integer vertex coordinates and triangle indices.

use bytemuck::{Pod, Zeroable};

use crate::error::{OceanError, Result};

/// Largest resolution whose coordinates still fit in `u16`
const MAX_GRID_SIZE: usize = u16::MAX as usize + 1;

/// Grid vertex: integer (x, y) coordinates in `[0, N) × [0, N)`.
///
/// The shaders turn these into texel addresses and world positions, so no
/// floating-point value is ever stored in the mesh.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [u16; 2],
}

/// Water grid mesh, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterMesh {
    pub vertices: Vec<GridVertex>,
    pub indices: Vec<u32>,
    resolution: usize,
}

impl WaterMesh {
    /// Build an `n × n` grid: `n²` vertices and `6·(n−1)²` indices.
    ///
    /// Vertices are laid out row by row. Each cell with top-left vertex `v`
    /// emits `(v, v+1, v+n)` and `(v+1, v+n, v+n+1)`.
    pub fn build(n: usize) -> Result<Self> {
        if !(2..=MAX_GRID_SIZE).contains(&n) {
            return Err(OceanError::InvalidGridSize(n));
        }

        let mut vertices = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                vertices.push(GridVertex {
                    position: [x as u16, y as u16],
                });
            }
        }

        let cells = n - 1;
        let mut indices = Vec::with_capacity(6 * cells * cells);
        for y in 0..cells {
            for x in 0..cells {
                let v = (y * n + x) as u32;
                let below = v + n as u32;

                indices.extend_from_slice(&[v, v + 1, below, v + 1, below, below + 1]);
            }
        }

        Ok(Self {
            vertices,
            indices,
            resolution: n,
        })
    }

    /// Vertices per side
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_counts() {
        for n in [2, 3, 7, 200] {
            let mesh = WaterMesh::build(n).unwrap();
            assert_eq!(mesh.vertices.len(), n * n);
            assert_eq!(mesh.indices.len(), 6 * (n - 1) * (n - 1));
            assert!(mesh.indices.iter().all(|&i| (i as usize) < n * n));
        }
    }

    #[test]
    fn test_mesh_three_by_three() {
        let mesh = WaterMesh::build(3).unwrap();

        let coords: Vec<[u16; 2]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            coords,
            vec![
                [0, 0],
                [1, 0],
                [2, 0],
                [0, 1],
                [1, 1],
                [2, 1],
                [0, 2],
                [1, 2],
                [2, 2],
            ]
        );

        assert_eq!(
            mesh.indices,
            vec![
                0, 1, 3, 1, 3, 4, // cell (0, 0)
                1, 2, 4, 2, 4, 5, // cell (1, 0)
                3, 4, 6, 4, 6, 7, // cell (0, 1)
                4, 5, 7, 5, 7, 8, // cell (1, 1)
            ]
        );
    }

    #[test]
    fn test_mesh_triangles_stay_within_one_cell() {
        let n = 5;
        let mesh = WaterMesh::build(n).unwrap();

        for tri in mesh.indices.chunks(3) {
            let xs: Vec<u16> = tri.iter().map(|&i| mesh.vertices[i as usize].position[0]).collect();
            let ys: Vec<u16> = tri.iter().map(|&i| mesh.vertices[i as usize].position[1]).collect();
            assert!(xs.iter().max().unwrap() - xs.iter().min().unwrap() == 1);
            assert!(ys.iter().max().unwrap() - ys.iter().min().unwrap() == 1);
        }
    }

    #[test]
    fn test_mesh_is_reproducible() {
        assert_eq!(WaterMesh::build(17).unwrap(), WaterMesh::build(17).unwrap());
    }

    #[test]
    fn test_mesh_rejects_degenerate_sizes() {
        assert!(matches!(
            WaterMesh::build(0),
            Err(OceanError::InvalidGridSize(0))
        ));
        assert!(matches!(
            WaterMesh::build(1),
            Err(OceanError::InvalidGridSize(1))
        ));
        assert!(WaterMesh::build(MAX_GRID_SIZE + 1).is_err());
    }
}
