//! Particle-grid velocity transfer for 2D FLIP/PIC.
//!
//! P2G: scatter particle velocities to the staggered grid with bilinear
//! weights, then normalize by the accumulated weight.
//! G2P: gather grid velocities back to particles, blending a PIC estimate
//! with a FLIP correction.
//!
//! Each velocity component is handled in its own pass with its own staggered
//! half-cell offset: u nodes sit on vertical faces (offset half a cell in Y),
//! v nodes on horizontal faces (offset half a cell in X).

use crate::constants::{CELL_COUNT, CELL_SIZE, GRID_SIZE};
use crate::grid::{cell_index, Grid2D};
use crate::particle::Particles2D;

/// Bilinear stencil for one staggered component: the four node indices and
/// their weights around a particle.
#[inline]
fn stencil(px: f32, py: f32, offset_x: f32, offset_y: f32) -> ([usize; 4], [f32; 4]) {
    let inv_h = GRID_SIZE as f32;
    let fx = (px - offset_x) * inv_h;
    let fy = (py - offset_y) * inv_h;

    let x0 = (fx.floor() as i32).clamp(0, GRID_SIZE as i32 - 1) as usize;
    let y0 = (fy.floor() as i32).clamp(0, GRID_SIZE as i32 - 1) as usize;
    let x1 = (x0 + 1).min(GRID_SIZE - 1);
    let y1 = (y0 + 1).min(GRID_SIZE - 1);

    let tx = (fx - x0 as f32).clamp(0.0, 1.0);
    let ty = (fy - y0 as f32).clamp(0.0, 1.0);
    let sx = 1.0 - tx;
    let sy = 1.0 - ty;

    (
        [
            cell_index(x0, y0),
            cell_index(x1, y0),
            cell_index(x1, y1),
            cell_index(x0, y1),
        ],
        [sx * sy, tx * sy, tx * ty, sx * ty],
    )
}

/// Transfer particle velocities to the grid (P2G).
///
/// Snapshots the current grid velocities for the FLIP delta, zeroes the
/// velocity and weight accumulators, scatter-adds every particle into the
/// four surrounding nodes of each component, then divides each node by its
/// accumulated weight. Nodes no particle touched keep velocity zero and are
/// never divided.
pub fn particles_to_grid(grid: &mut Grid2D, particles: &Particles2D) {
    grid.store_prev_velocities();
    grid.clear_transfer_accumulators();

    // ===== U component (vertical faces, offset half a cell in Y) =====
    for p in &particles.list {
        let (nodes, weights) = stencil(p.position.x, p.position.y, 0.0, 0.5 * CELL_SIZE);
        for (&n, &w) in nodes.iter().zip(&weights) {
            grid.u[n] += p.velocity.x * w;
            grid.u_weight[n] += w;
        }
    }

    // ===== V component (horizontal faces, offset half a cell in X) =====
    for p in &particles.list {
        let (nodes, weights) = stencil(p.position.x, p.position.y, 0.5 * CELL_SIZE, 0.0);
        for (&n, &w) in nodes.iter().zip(&weights) {
            grid.v[n] += p.velocity.y * w;
            grid.v_weight[n] += w;
        }
    }

    for i in 0..CELL_COUNT {
        if grid.u_weight[i] > 0.0 {
            grid.u[i] /= grid.u_weight[i];
        }
        if grid.v_weight[i] > 0.0 {
            grid.v[i] /= grid.v_weight[i];
        }
    }
}

/// Transfer grid velocities back to particles (G2P).
///
/// For each component: PIC = weighted current grid velocity; FLIP = the
/// particle's own velocity plus the weighted change between current and
/// previous grid velocity. The blend `flip_ratio` near 1 preserves energy,
/// near 0 diffuses. Must run after the pressure projection so the sampled
/// field is divergence-free.
pub fn grid_to_particles(grid: &Grid2D, particles: &mut Particles2D, flip_ratio: f32) {
    for p in &mut particles.list {
        // ===== U component =====
        let (nodes, weights) = stencil(p.position.x, p.position.y, 0.0, 0.5 * CELL_SIZE);
        let mut pic = 0.0;
        let mut delta = 0.0;
        for (&n, &w) in nodes.iter().zip(&weights) {
            pic += grid.u[n] * w;
            delta += (grid.u[n] - grid.prev_u[n]) * w;
        }
        let flip = p.velocity.x + delta;
        p.velocity.x = (1.0 - flip_ratio) * pic + flip_ratio * flip;

        // ===== V component =====
        let (nodes, weights) = stencil(p.position.x, p.position.y, 0.5 * CELL_SIZE, 0.0);
        let mut pic = 0.0;
        let mut delta = 0.0;
        for (&n, &w) in nodes.iter().zip(&weights) {
            pic += grid.v[n] * w;
            delta += (grid.v[n] - grid.prev_v[n]) * w;
        }
        let flip = p.velocity.y + delta;
        p.velocity.y = (1.0 - flip_ratio) * pic + flip_ratio * flip;
    }
}
