//! Pairwise particle separation using a counting-sort spatial hash.
//!
//! The hash grid is finer than the simulation grid: one bucket is roughly one
//! particle diameter, so overlap candidates are confined to the 3x3 bucket
//! neighborhood. Buckets are rebuilt from scratch each frame with a two-pass
//! counting sort, which needs no per-frame allocation and costs O(particles).

use crate::constants::{MAX_PARTICLES, PARTICLE_RADIUS};
use crate::particle::Particles2D;

/// Buckets per axis. One bucket spans about one particle diameter.
pub const BUCKET_COLS: usize = (1.0 / (2.0 * PARTICLE_RADIUS)) as usize;

/// Total bucket count.
pub const BUCKET_COUNT: usize = BUCKET_COLS * BUCKET_COLS;

const INV_SPACING: f32 = BUCKET_COLS as f32;

/// Counting-sort bucket index over particle positions.
///
/// Frame-local: `build` overwrites everything, nothing persists.
#[derive(Clone, Debug)]
pub struct SeparationGrid {
    /// Occupants per bucket
    counts: Vec<u16>,
    /// Prefix offsets; after the scatter, `first[b]..first[b + 1]` spans
    /// bucket b's ids
    first: Vec<usize>,
    /// Particle ids ordered by bucket
    ids: Vec<u16>,
}

impl SeparationGrid {
    pub fn new() -> Self {
        Self {
            counts: vec![0; BUCKET_COUNT],
            first: vec![0; BUCKET_COUNT + 1],
            ids: vec![0; MAX_PARTICLES],
        }
    }

    /// Bucket coordinate of a position along one axis.
    #[inline]
    fn coord(x: f32) -> usize {
        ((x * INV_SPACING) as i32).clamp(0, BUCKET_COLS as i32 - 1) as usize
    }

    #[inline]
    fn bucket(x: f32, y: f32) -> usize {
        Self::coord(x) * BUCKET_COLS + Self::coord(y)
    }

    /// Rebuild the index: count occupants, prefix-sum into end offsets, then
    /// scatter ids by pre-decrementing. Once every particle is placed,
    /// `first[b]` has walked back to the start of bucket b.
    pub fn build(&mut self, particles: &Particles2D) {
        self.counts.fill(0);
        for p in &particles.list {
            self.counts[Self::bucket(p.position.x, p.position.y)] += 1;
        }

        let mut prefix = 0usize;
        for (bucket, &count) in self.counts.iter().enumerate() {
            prefix += count as usize;
            self.first[bucket] = prefix;
        }
        self.first[BUCKET_COUNT] = prefix;

        for (i, p) in particles.list.iter().enumerate() {
            let bucket = Self::bucket(p.position.x, p.position.y);
            self.first[bucket] -= 1;
            self.ids[self.first[bucket]] = i as u16;
        }
    }

    /// Ids stored in bucket (bx, by).
    #[inline]
    fn bucket_ids(&self, bx: usize, by: usize) -> &[u16] {
        let bucket = bx * BUCKET_COLS + by;
        &self.ids[self.first[bucket]..self.first[bucket + 1]]
    }
}

impl Default for SeparationGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Relax pairwise overlaps so no two particle centers sit closer than one
/// particle diameter, approximately, within the iteration budget.
///
/// The hash is built once and reused across all iterations even though
/// positions drift between sweeps; rebuilding per iteration is not worth the
/// cost at this accuracy target. Pairs at exactly zero distance have no
/// defined separation normal and are skipped.
pub fn push_particles_apart(
    particles: &mut Particles2D,
    buckets: &mut SeparationGrid,
    iterations: usize,
) {
    if iterations == 0 || particles.is_empty() {
        return;
    }

    let min_dist = 2.0 * PARTICLE_RADIUS;
    let min_dist2 = min_dist * min_dist;

    buckets.build(particles);

    for _ in 0..iterations {
        for i in 0..particles.list.len() {
            let pos = particles.list[i].position;
            let bx = SeparationGrid::coord(pos.x);
            let by = SeparationGrid::coord(pos.y);

            for nx in bx.saturating_sub(1)..=(bx + 1).min(BUCKET_COLS - 1) {
                for ny in by.saturating_sub(1)..=(by + 1).min(BUCKET_COLS - 1) {
                    for &id in buckets.bucket_ids(nx, ny) {
                        let j = id as usize;
                        // Process each pair once
                        if j <= i {
                            continue;
                        }

                        let delta = particles.list[j].position - particles.list[i].position;
                        let d2 = delta.length_squared();
                        if d2 >= min_dist2 || d2 == 0.0 {
                            continue;
                        }

                        let d = d2.sqrt();
                        let push = delta * (0.5 * (min_dist - d) / d);
                        particles.list[i].position -= push;
                        particles.list[j].position += push;
                    }
                }
            }
        }
    }
}
