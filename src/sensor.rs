//! Accelerometer capability and gravity mapping.
//!
//! The simulation never owns the inertial sensor; it borrows it for exactly
//! one read per frame through this capability trait. A failed read means "no
//! new data this frame" and leaves the gravity vector untouched.

use glam::{Vec2, Vec3};

use crate::constants::{ACCEL_TO_GRAVITY, GRAVITY_SCALE};

/// One-operation capability over the inertial sensor.
pub trait Accelerometer {
    /// Attempt to read a 3-axis acceleration sample in g-units.
    /// Returns None when no sample is available.
    fn read_acceleration(&mut self) -> Option<Vec3>;
}

/// Map a raw 3-axis sample into the simulation's 2D gravity vector.
///
/// The device is mounted with its sensor X axis along the display's -Y and
/// its Y axis along the display's +X, so the two in-plane axes are swapped
/// and one is negated; the Z axis (out of the display) is discarded.
#[inline]
pub fn gravity_from_sample(raw: Vec3) -> Vec2 {
    Vec2::new(raw.y, -raw.x) * (ACCEL_TO_GRAVITY * GRAVITY_SCALE)
}
