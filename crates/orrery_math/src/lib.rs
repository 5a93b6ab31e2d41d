//! Orrery math types.
//!
//! Everything is double precision: the renderer works in `f64` throughout,
//! so the `glam` double vector is re-exported under the short names used by
//! the rest of the workspace.

pub use glam::{dvec3, DVec3};

/// A 3-component double vector.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB color, components nominally in [0, 1] before gamma.
pub type Color = DVec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Returns true if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    (1.0 - t) * a + t * b
}
