//! Ember math types.
//!
//! Double-precision vector algebra on top of glam, plus the ray and
//! interval types the renderer builds on.

// Re-export glam for convenience
pub use glam;

/// 3-component vector used as a point, a direction, or a linear color.
pub type Vec3 = glam::DVec3;

/// A position in world space.
pub type Point3 = Vec3;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Components below this magnitude count as zero for [`Vec3Ext::near_zero`].
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Vector operations glam does not provide.
pub trait Vec3Ext {
    /// True if every component is within [`NEAR_ZERO_EPSILON`] of zero.
    fn near_zero(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }
}

/// Convert degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}
