//! 2D MAC (Marker-and-Cell) staggered grid over the unit square.
//!
//! Velocity components are stored on cell faces:
//! - u (X-velocity) on the left vertical face of each cell
//! - v (Y-velocity) on the bottom horizontal face of each cell
//!
//! Pressure, cell type and the openness factor are stored at cell centers.
//! Every field is a flat array of `CELL_COUNT` entries addressed through
//! [`cell_index`]; u/v share the cell-centered indexing, so `u[cell_index(gx,
//! gy)]` is the face between cells (gx-1, gy) and (gx, gy).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{CELL_COUNT, CELL_SIZE, GRID_SIZE};

/// Cell classification for the pressure solve.
///
/// Set once at construction from the container geometry and immutable
/// afterwards: it encodes the disk-shaped container, not fluid occupancy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CellType {
    /// Outside the container (no flow)
    #[default]
    Solid,
    /// Inside the container, eligible for the pressure solve
    Fluid,
}

/// Index into any cell-centered or face-centered array.
#[inline]
pub const fn cell_index(gx: usize, gy: usize) -> usize {
    gx * GRID_SIZE + gy
}

/// 2D MAC grid with staggered velocities and per-frame transfer accumulators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid2D {
    /// U velocity (X-component) on left faces
    pub u: Vec<f32>,
    /// V velocity (Y-component) on bottom faces
    pub v: Vec<f32>,
    /// U velocity snapshot from the previous transfer (for the FLIP delta)
    pub prev_u: Vec<f32>,
    /// V velocity snapshot from the previous transfer (for the FLIP delta)
    pub prev_v: Vec<f32>,
    /// Accumulated bilinear weights for U, valid only during P2G
    pub u_weight: Vec<f32>,
    /// Accumulated bilinear weights for V, valid only during P2G
    pub v_weight: Vec<f32>,
    /// Pressure at cell centers, accumulated across solver sweeps each frame
    pub pressure: Vec<f32>,
    /// Cell classification (container geometry)
    pub cell_type: Vec<CellType>,
    /// Openness fraction per cell, fixed at 1.0 (reserved for partial
    /// obstacles)
    pub openness: Vec<f32>,
}

impl Grid2D {
    /// Create the grid and classify cells against the circular container.
    ///
    /// A cell is Fluid when its center lies within a disk of radius
    /// `0.5 - CELL_SIZE` around the domain center. The shrunken radius keeps
    /// the container strictly inside the grid so boundary faces never receive
    /// particle transfers.
    pub fn new() -> Self {
        let mut cell_type = vec![CellType::Solid; CELL_COUNT];
        let radius = 0.5 - CELL_SIZE;

        for gx in 0..GRID_SIZE {
            for gy in 0..GRID_SIZE {
                let center = Self::cell_center(gx, gy) - Vec2::splat(0.5);
                if center.length_squared() <= radius * radius {
                    cell_type[cell_index(gx, gy)] = CellType::Fluid;
                }
            }
        }

        Self {
            u: vec![0.0; CELL_COUNT],
            v: vec![0.0; CELL_COUNT],
            prev_u: vec![0.0; CELL_COUNT],
            prev_v: vec![0.0; CELL_COUNT],
            u_weight: vec![0.0; CELL_COUNT],
            v_weight: vec![0.0; CELL_COUNT],
            pressure: vec![0.0; CELL_COUNT],
            cell_type,
            openness: vec![1.0; CELL_COUNT],
        }
    }

    /// World position of the center of cell (gx, gy).
    #[inline]
    pub fn cell_center(gx: usize, gy: usize) -> Vec2 {
        Vec2::new(
            (gx as f32 + 0.5) * CELL_SIZE,
            (gy as f32 + 0.5) * CELL_SIZE,
        )
    }

    /// Store current velocities as the previous-frame snapshot (for FLIP).
    pub fn store_prev_velocities(&mut self) {
        self.prev_u.copy_from_slice(&self.u);
        self.prev_v.copy_from_slice(&self.v);
    }

    /// Zero velocities and weight accumulators ahead of a P2G scatter.
    pub fn clear_transfer_accumulators(&mut self) {
        self.u.fill(0.0);
        self.v.fill(0.0);
        self.u_weight.fill(0.0);
        self.v_weight.fill(0.0);
    }

    /// Check if a cell participates in the pressure solve.
    #[inline]
    pub fn is_fluid(&self, gx: usize, gy: usize) -> bool {
        self.cell_type[cell_index(gx, gy)] == CellType::Fluid
    }
}

impl Default for Grid2D {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_sizes() {
        let grid = Grid2D::new();
        assert_eq!(grid.u.len(), CELL_COUNT);
        assert_eq!(grid.v.len(), CELL_COUNT);
        assert_eq!(grid.pressure.len(), CELL_COUNT);
        assert_eq!(grid.cell_type.len(), CELL_COUNT);
    }

    #[test]
    fn test_cell_index_layout() {
        // Column-major: gx strides by GRID_SIZE, gy is contiguous
        assert_eq!(cell_index(0, 0), 0);
        assert_eq!(cell_index(0, 1), 1);
        assert_eq!(cell_index(1, 0), GRID_SIZE);
        assert_eq!(cell_index(2, 3), 2 * GRID_SIZE + 3);
    }

    #[test]
    fn test_container_classification() {
        let grid = Grid2D::new();

        // Center of the domain is inside the disk
        let mid = GRID_SIZE / 2;
        assert_eq!(grid.cell_type[cell_index(mid, mid)], CellType::Fluid);

        // Corners are outside
        assert_eq!(grid.cell_type[cell_index(0, 0)], CellType::Solid);
        assert_eq!(
            grid.cell_type[cell_index(GRID_SIZE - 1, GRID_SIZE - 1)],
            CellType::Solid
        );

        // Outermost ring is entirely solid (radius shrunk by one cell)
        for i in 0..GRID_SIZE {
            assert_eq!(grid.cell_type[cell_index(i, 0)], CellType::Solid);
            assert_eq!(grid.cell_type[cell_index(0, i)], CellType::Solid);
            assert_eq!(
                grid.cell_type[cell_index(i, GRID_SIZE - 1)],
                CellType::Solid
            );
            assert_eq!(
                grid.cell_type[cell_index(GRID_SIZE - 1, i)],
                CellType::Solid
            );
        }
    }

    #[test]
    fn test_openness_initialized_to_one() {
        let grid = Grid2D::new();
        assert!(grid.openness.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_store_prev_velocities() {
        let mut grid = Grid2D::new();
        grid.u.fill(1.5);
        grid.v.fill(-0.5);
        grid.store_prev_velocities();
        assert!(grid.prev_u.iter().all(|&x| x == 1.5));
        assert!(grid.prev_v.iter().all(|&x| x == -0.5));
    }
}
