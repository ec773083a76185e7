//! Per-cell visual fluid classification.
//!
//! Converts per-frame particle coverage statistics into a discrete state per
//! cell for the renderer, smooths rim edges with a single 4-neighborhood
//! convolution pass, and diffs against the previous frame so the display can
//! redraw incrementally.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CELL_COUNT, FLUID_PARTICLE_THRESHOLD, FOAM_SPEED_THRESHOLD, GRID_SIZE,
    PARTICLE_VISUAL_RADIUS, RIM_PARTICLE_THRESHOLD,
};
use crate::grid::{cell_index, Grid2D};
use crate::particle::Particles2D;

/// Discrete visual state of one cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum FluidState {
    #[default]
    Empty,
    /// Faint halo cell touching exactly one filled neighbor
    RimLight,
    /// Translucent edge cell
    RimTransparent,
    Liquid,
    /// Filled cell whose particles move fast enough to aerate
    Foam,
}

impl FluidState {
    /// States that count as filled for the smoothing convolution.
    #[inline]
    fn is_filled(self) -> bool {
        matches!(
            self,
            FluidState::RimTransparent | FluidState::Liquid | FluidState::Foam
        )
    }
}

/// Double-buffered classification grid plus per-frame coverage accumulators.
///
/// Derived purely from particle statistics; never touches grid velocities or
/// pressure.
#[derive(Clone, Debug)]
pub struct FluidField {
    /// Classification for the current frame
    pub current: Vec<FluidState>,
    /// Classification from the previous frame
    pub previous: Vec<FluidState>,
    /// Convolution write buffer
    scratch: Vec<FluidState>,
    /// Particles covering each cell this frame
    counts: Vec<u16>,
    /// Summed speed of covering particles
    speed_sum: Vec<f32>,
    /// Indices of cells whose state changed this frame
    pub changed: Vec<u16>,
}

impl FluidField {
    pub fn new() -> Self {
        Self {
            current: vec![FluidState::Empty; CELL_COUNT],
            previous: vec![FluidState::Empty; CELL_COUNT],
            scratch: vec![FluidState::Empty; CELL_COUNT],
            counts: vec![0; CELL_COUNT],
            speed_sum: vec![0.0; CELL_COUNT],
            changed: Vec::with_capacity(CELL_COUNT),
        }
    }

    /// Recompute the classification from the current particle set and emit
    /// the changed-cell list.
    pub fn update(&mut self, particles: &Particles2D) {
        self.previous.copy_from_slice(&self.current);

        self.accumulate_coverage(particles);
        self.classify_base();
        self.smooth_rims();
        self.diff();
    }

    /// Coverage pass: for every particle, visit the AABB of cells within the
    /// visual radius and count the ones whose center is truly inside it.
    fn accumulate_coverage(&mut self, particles: &Particles2D) {
        self.counts.fill(0);
        self.speed_sum.fill(0.0);

        let r = PARTICLE_VISUAL_RADIUS;
        let r2 = r * r;
        let max_cell = GRID_SIZE as i32 - 1;

        for p in &particles.list {
            let speed = p.velocity.length();

            let gx0 = (((p.position.x - r) * GRID_SIZE as f32) as i32).clamp(0, max_cell);
            let gy0 = (((p.position.y - r) * GRID_SIZE as f32) as i32).clamp(0, max_cell);
            let gx1 = (((p.position.x + r) * GRID_SIZE as f32) as i32).clamp(0, max_cell);
            let gy1 = (((p.position.y + r) * GRID_SIZE as f32) as i32).clamp(0, max_cell);

            for gx in gx0..=gx1 {
                for gy in gy0..=gy1 {
                    let center = Grid2D::cell_center(gx as usize, gy as usize);
                    if (center - p.position).length_squared() > r2 {
                        continue;
                    }
                    let c = cell_index(gx as usize, gy as usize);
                    self.counts[c] += 1;
                    self.speed_sum[c] += speed;
                }
            }
        }
    }

    /// Threshold the coverage statistics into the base classification.
    fn classify_base(&mut self) {
        for c in 0..CELL_COUNT {
            let n = self.counts[c];
            self.current[c] = if n >= FLUID_PARTICLE_THRESHOLD {
                let mean_speed = self.speed_sum[c] / n as f32;
                if mean_speed > FOAM_SPEED_THRESHOLD {
                    FluidState::Foam
                } else {
                    FluidState::Liquid
                }
            } else if n >= RIM_PARTICLE_THRESHOLD {
                FluidState::RimTransparent
            } else {
                FluidState::Empty
            };
        }
    }

    /// Single smoothing pass: promote Empty cells by how many of their 4
    /// orthogonal neighbors are filled. Reads the frozen base classification,
    /// writes the scratch buffer, commits at the end, so promotions never
    /// cascade within the pass.
    fn smooth_rims(&mut self) {
        self.scratch.copy_from_slice(&self.current);

        for gx in 0..GRID_SIZE {
            for gy in 0..GRID_SIZE {
                let c = cell_index(gx, gy);
                if self.current[c] != FluidState::Empty {
                    continue;
                }

                let mut touching = 0u32;
                if gx > 0 && self.current[cell_index(gx - 1, gy)].is_filled() {
                    touching += 1;
                }
                if gx + 1 < GRID_SIZE && self.current[cell_index(gx + 1, gy)].is_filled() {
                    touching += 1;
                }
                if gy > 0 && self.current[cell_index(gx, gy - 1)].is_filled() {
                    touching += 1;
                }
                if gy + 1 < GRID_SIZE && self.current[cell_index(gx, gy + 1)].is_filled() {
                    touching += 1;
                }

                self.scratch[c] = match touching {
                    4 => FluidState::Liquid,
                    2 | 3 => FluidState::RimTransparent,
                    1 => FluidState::RimLight,
                    _ => FluidState::Empty,
                };
            }
        }

        self.current.copy_from_slice(&self.scratch);
    }

    /// Emit the indices of cells that changed since the previous frame.
    fn diff(&mut self) {
        self.changed.clear();
        for c in 0..CELL_COUNT {
            if self.current[c] != self.previous[c] {
                self.changed.push(c as u16);
            }
        }
    }
}

impl Default for FluidField {
    fn default() -> Self {
        Self::new()
    }
}
