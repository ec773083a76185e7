//! 2D FLIP/PIC Fluid Simulation
//!
//! A hybrid particle/grid liquid solver sized for an embedded frame loop
//! driving a small round display. A fixed particle set carries the fluid, a
//! staggered MAC grid enforces approximate incompressibility, and a per-cell
//! classifier turns coverage statistics into a paintable fluid state with an
//! incremental-redraw diff. All buffers are allocated once at construction;
//! a frame never allocates.
//!
//! # Example
//!
//! ```
//! use flip2d::FlipSimulation2D;
//! use glam::Vec2;
//!
//! let mut sim = FlipSimulation2D::new(500, 1);
//! sim.gravity = Vec2::new(0.0, -5.0);
//!
//! // Run simulation frames
//! for _ in 0..3 {
//!     sim.step(1.0 / 60.0);
//! }
//!
//! // Feed the changed cells to the renderer
//! for &cell in sim.changed_cells() {
//!     let _ = sim.fluid_states()[cell as usize];
//! }
//! ```

pub mod classify;
pub mod constants;
pub mod diagnostics;
pub mod grid;
pub mod integrate;
pub mod particle;
pub mod pressure;
pub mod sensor;
pub mod separation;
pub mod serde_utils;
pub mod transfer;

pub use classify::{FluidField, FluidState};
pub use diagnostics::{profiled_step, FrameProfiler, Stage};
pub use glam::{Vec2, Vec3};
pub use grid::{cell_index, CellType, Grid2D};
pub use particle::{Particle2D, Particles2D};
pub use sensor::Accelerometer;

use rand::rngs::StdRng;
use rand::SeedableRng;

use constants::{
    FLIP_RATIO, MAX_PARTICLES, PRESSURE_ITERATIONS, SEPARATION_ITERATIONS,
};
use separation::SeparationGrid;

/// 2D FLIP fluid simulation.
///
/// Owns every buffer for its lifetime. The sensor and renderer only ever see
/// borrowed views.
pub struct FlipSimulation2D {
    /// The staggered grid for velocity and pressure
    pub grid: Grid2D,
    /// All particles in the simulation
    pub particles: Particles2D,
    /// Per-cell visual classification and redraw diff
    pub fluid: FluidField,

    /// Counting-sort buckets for the separation pass (frame-local)
    separation: SeparationGrid,

    /// External acceleration, updated from the accelerometer. Zero until the
    /// first successful sensor read.
    pub gravity: Vec2,
    /// FLIP/PIC blend ratio for grid-to-particle transfer
    pub flip_ratio: f32,
    /// Pressure solver sweeps per frame
    pub pressure_iterations: usize,
    /// Separation sweeps per frame
    pub separation_iterations: usize,

    /// Current simulation frame
    pub frame: u32,
}

impl FlipSimulation2D {
    /// Create a simulation with `particle_count` particles seeded from the
    /// given RNG seed. Counts above the build-time capacity are clamped.
    pub fn new(particle_count: usize, seed: u64) -> Self {
        let mut particles = Particles2D::with_capacity(MAX_PARTICLES);
        let mut rng = StdRng::seed_from_u64(seed);
        particles.seed(particle_count.min(MAX_PARTICLES), &mut rng);

        Self {
            grid: Grid2D::new(),
            particles,
            fluid: FluidField::new(),
            separation: SeparationGrid::new(),
            gravity: Vec2::ZERO,
            flip_ratio: FLIP_RATIO,
            pressure_iterations: PRESSURE_ITERATIONS,
            separation_iterations: SEPARATION_ITERATIONS,
            frame: 0,
        }
    }

    /// Run one simulation frame.
    pub fn step(&mut self, dt: f32) {
        // 1. Integrate particles under gravity and collide with the container
        self.integrate(dt);

        // 2. Relax particle overlaps
        self.separate();

        // 3. P2G: scatter particle velocities onto the staggered grid
        self.transfer_to_grid();

        // 4. Pressure projection (approximately divergence-free grid field)
        self.project(dt);

        // 5. G2P: blend the projected field back into particle velocities
        self.transfer_to_particles();

        // 6. Reclassify cells and diff against the previous frame
        self.classify();

        self.frame += 1;
    }

    /// Read the accelerometer once and update gravity. A failed read keeps
    /// the previous gravity vector.
    pub fn sample_accelerometer(&mut self, imu: &mut dyn Accelerometer) {
        if let Some(raw) = imu.read_acceleration() {
            self.gravity = sensor::gravity_from_sample(raw);
        }
    }

    // ========== Pipeline stages ==========

    /// Stage 1: advance particles and resolve container collisions.
    pub fn integrate(&mut self, dt: f32) {
        integrate::integrate_particles(&mut self.particles, self.gravity, dt);
    }

    /// Stage 2: push overlapping particles apart.
    pub fn separate(&mut self) {
        separation::push_particles_apart(
            &mut self.particles,
            &mut self.separation,
            self.separation_iterations,
        );
    }

    /// Stage 3: particle-to-grid velocity transfer.
    pub fn transfer_to_grid(&mut self) {
        transfer::particles_to_grid(&mut self.grid, &self.particles);
    }

    /// Stage 4: pressure projection over fluid cells.
    pub fn project(&mut self, dt: f32) {
        pressure::solve_incompressibility(&mut self.grid, self.pressure_iterations, dt);
    }

    /// Stage 5: grid-to-particle velocity transfer (FLIP/PIC blend).
    pub fn transfer_to_particles(&mut self) {
        transfer::grid_to_particles(&self.grid, &mut self.particles, self.flip_ratio);
    }

    /// Stage 6: per-cell classification and redraw diff.
    pub fn classify(&mut self) {
        self.fluid.update(&self.particles);
    }

    // ========== Render queries ==========

    /// Read-only particle snapshot for the renderer.
    pub fn particles(&self) -> &[Particle2D] {
        &self.particles.list
    }

    /// Current per-cell classification.
    pub fn fluid_states(&self) -> &[FluidState] {
        &self.fluid.current
    }

    /// Cells whose classification changed last frame.
    pub fn changed_cells(&self) -> &[u16] {
        &self.fluid.changed
    }

    /// Total particle count.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONTAINER_RADIUS, PARTICLE_RADIUS};

    #[test]
    fn test_simulation_creation() {
        let sim = FlipSimulation2D::new(200, 1);
        assert_eq!(sim.particle_count(), 200);
        assert_eq!(sim.frame, 0);
        assert_eq!(sim.gravity, Vec2::ZERO);
    }

    #[test]
    fn test_particle_count_clamped_to_capacity() {
        let sim = FlipSimulation2D::new(MAX_PARTICLES * 2, 1);
        assert_eq!(sim.particle_count(), MAX_PARTICLES);
    }

    #[test]
    fn test_step_preserves_particle_count() {
        let mut sim = FlipSimulation2D::new(300, 9);
        sim.gravity = Vec2::new(0.0, -5.0);

        for _ in 0..10 {
            sim.step(1.0 / 60.0);
        }

        assert_eq!(sim.particle_count(), 300);
        assert_eq!(sim.frame, 10);
    }

    #[test]
    fn test_particles_settle_downward_under_gravity() {
        let mut sim = FlipSimulation2D::new(300, 4);
        sim.gravity = Vec2::new(0.0, -5.0);

        let avg_y_before: f32 =
            sim.particles().iter().map(|p| p.position.y).sum::<f32>() / 300.0;

        for _ in 0..30 {
            sim.step(1.0 / 60.0);
        }

        let avg_y_after: f32 =
            sim.particles().iter().map(|p| p.position.y).sum::<f32>() / 300.0;

        assert!(
            avg_y_after < avg_y_before,
            "particles should fall: before {} after {}",
            avg_y_before,
            avg_y_after
        );
    }

    #[test]
    fn test_containment_over_many_frames() {
        let mut sim = FlipSimulation2D::new(400, 11);
        sim.gravity = Vec2::new(3.0, -8.0);

        for _ in 0..60 {
            sim.step(1.0 / 60.0);
        }

        // Separation runs after the collision pass, so allow one radius of
        // slack beyond the swept container radius
        let limit = CONTAINER_RADIUS + PARTICLE_RADIUS;
        for (i, p) in sim.particles().iter().enumerate() {
            let dist = (p.position - Vec2::splat(0.5)).length();
            assert!(
                dist <= limit + 1e-4,
                "particle {} escaped: dist {} > {}",
                i,
                dist,
                limit
            );
            assert!(p.position.x >= 0.0 && p.position.x <= 1.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 1.0);
        }
    }

    #[test]
    fn test_identical_seeds_agree() {
        let mut a = FlipSimulation2D::new(200, 77);
        let mut b = FlipSimulation2D::new(200, 77);
        a.gravity = Vec2::new(0.0, -5.0);
        b.gravity = Vec2::new(0.0, -5.0);

        for _ in 0..5 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }

        assert_eq!(a.fluid.current, b.fluid.current);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position, pb.position);
        }
    }
}
