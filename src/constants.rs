//! Build-time configuration for the simulation.
//!
//! ## Units
//!
//! The domain is the unit square [0,1]x[0,1]; the circular container is the
//! inscribed disk. All lengths below are in normalized domain units, all
//! speeds in domain units per second. Nothing here is runtime-configurable:
//! the grid resolution and particle capacity size every buffer in the crate.

/// Cells per axis of the simulation grid.
pub const GRID_SIZE: usize = 24;

/// Total cell count (flat array length for all cell-centered fields).
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Edge length of one grid cell in domain units.
pub const CELL_SIZE: f32 = 1.0 / GRID_SIZE as f32;

/// Particle capacity. Fixed at startup; the solver never adds or removes.
pub const MAX_PARTICLES: usize = 500;

/// Physical particle radius, used by collision and separation.
pub const PARTICLE_RADIUS: f32 = 0.3 * CELL_SIZE;

/// Coverage radius used by the fluid classifier. Larger than the physical
/// radius so a single particle registers on the cells it visually wets.
pub const PARTICLE_VISUAL_RADIUS: f32 = 1.5 * CELL_SIZE;

/// Radius of the circular container swept by particle centers.
pub const CONTAINER_RADIUS: f32 = 0.5 - CELL_SIZE - PARTICLE_RADIUS;

/// Normal-velocity scale applied on wall bounce.
pub const RESTITUTION: f32 = 0.3;

/// Tangential damping applied on wall contact (0 = frictionless).
pub const FRICTION: f32 = 0.05;

/// FLIP/PIC blend for grid-to-particle transfer. 1.0 = pure FLIP
/// (energy-preserving, noisy), 0.0 = pure PIC (diffusive).
pub const FLIP_RATIO: f32 = 0.9;

/// Gauss-Seidel over-relaxation factor for the pressure solve.
pub const OVER_RELAXATION: f32 = 1.9;

/// Pressure solver sweeps per frame.
pub const PRESSURE_ITERATIONS: usize = 12;

/// Particle separation sweeps per frame.
pub const SEPARATION_ITERATIONS: usize = 2;

/// Fluid density (kg/m^3), scales the accumulated pressure diagnostic.
pub const FLUID_DENSITY: f32 = 1000.0;

/// Particle coverage count at which a cell reads as filled liquid.
pub const FLUID_PARTICLE_THRESHOLD: u16 = 3;

/// Particle coverage count at which a cell reads as a translucent rim.
pub const RIM_PARTICLE_THRESHOLD: u16 = 1;

/// Mean particle speed above which a filled cell reads as foam.
pub const FOAM_SPEED_THRESHOLD: f32 = 1.0;

/// Accelerometer g-units to domain acceleration.
pub const ACCEL_TO_GRAVITY: f32 = 10.0;

/// User-facing tilt sensitivity multiplier.
pub const GRAVITY_SCALE: f32 = 1.0;

/// Low edge of the seeding sub-square.
pub const SEED_REGION_MIN: f32 = 0.2;

/// High edge of the seeding sub-square.
pub const SEED_REGION_MAX: f32 = 0.8;

/// Seed velocities are uniform in +/- this many cell-widths per axis.
pub const SEED_VELOCITY_CELLS: f32 = 0.5;

/// Initial particle color (RGB, 0..1).
pub const PARTICLE_COLOR: [f32; 3] = [0.2, 0.4, 1.0];
