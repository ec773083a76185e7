//! Particle representation for the 2D FLIP simulation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CELL_SIZE, PARTICLE_COLOR, SEED_REGION_MAX, SEED_REGION_MIN, SEED_VELOCITY_CELLS,
};
use crate::serde_utils::{deserialize_vec2, serialize_vec2};

/// A single fluid particle.
///
/// The color is carried for the renderer only; the solver never reads it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Particle2D {
    /// Position in the normalized domain [0,1]x[0,1]
    #[serde(serialize_with = "serialize_vec2", deserialize_with = "deserialize_vec2")]
    pub position: Vec2,
    /// Current velocity in domain units per second
    #[serde(serialize_with = "serialize_vec2", deserialize_with = "deserialize_vec2")]
    pub velocity: Vec2,
    /// Render color (RGB, 0..1)
    pub color: [f32; 3],
}

impl Particle2D {
    /// Create a particle at the given position with the given velocity.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            color: PARTICLE_COLOR,
        }
    }
}

/// Collection of particles. The count is fixed once seeded.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Particles2D {
    pub list: Vec<Particle2D>,
}

impl Particles2D {
    /// Create an empty collection with the given pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: Vec::with_capacity(capacity),
        }
    }

    /// Seed `count` particles: position uniform in the central sub-square,
    /// velocity uniform in +/- half a cell-width per axis.
    pub fn seed(&mut self, count: usize, rng: &mut impl Rng) {
        self.list.clear();
        let vel_range = SEED_VELOCITY_CELLS * CELL_SIZE;
        for _ in 0..count {
            let position = Vec2::new(
                rng.gen_range(SEED_REGION_MIN..SEED_REGION_MAX),
                rng.gen_range(SEED_REGION_MIN..SEED_REGION_MAX),
            );
            let velocity = Vec2::new(
                rng.gen_range(-vel_range..vel_range),
                rng.gen_range(-vel_range..vel_range),
            );
            self.list.push(Particle2D::new(position, velocity));
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
