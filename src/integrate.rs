//! Particle integration and collision against the circular container.

use glam::Vec2;

use crate::constants::{CONTAINER_RADIUS, FRICTION, PARTICLE_RADIUS, RESTITUTION};
use crate::particle::Particles2D;

/// Advance every particle under the external acceleration and resolve wall
/// contact, in a single pass.
///
/// Semi-implicit Euler: velocity first, then position from the new velocity.
/// The position is clamped into the domain box inset by the particle radius
/// before the circle test; the box never binds in normal operation because
/// the container is strictly inside it.
///
/// On penetration of the container the particle is pushed back along the
/// inward normal by the penetration depth, then its velocity is split into
/// normal and tangential parts: the normal part is inverted and scaled by the
/// restitution coefficient, the tangential part damped by the friction
/// coefficient. One positional correction per frame is sufficient given the
/// conservative radius margin.
pub fn integrate_particles(particles: &mut Particles2D, accel: Vec2, dt: f32) {
    const CENTER: Vec2 = Vec2::splat(0.5);
    let r2 = CONTAINER_RADIUS * CONTAINER_RADIUS;

    for p in &mut particles.list {
        p.velocity += accel * dt;
        p.position += p.velocity * dt;

        p.position = p.position.clamp(
            Vec2::splat(PARTICLE_RADIUS),
            Vec2::splat(1.0 - PARTICLE_RADIUS),
        );

        let offset = p.position - CENTER;
        let d2 = offset.length_squared();
        if d2 > r2 {
            let d = d2.sqrt();
            let normal = offset / d;

            // Push back to the container surface
            p.position += normal * (CONTAINER_RADIUS - d);

            // Split velocity into normal and tangential parts
            let vn = p.velocity.dot(normal);
            let normal_vel = normal * vn;
            let tangent_vel = p.velocity - normal_vel;

            p.velocity = normal_vel * -RESTITUTION + tangent_vel * (1.0 - FRICTION);
        }
    }
}
