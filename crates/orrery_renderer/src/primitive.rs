//! Closed set of renderable primitives.

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, MovingSphere, Sphere};
use orrery_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// Every primitive the scene list can hold.
///
/// Dispatch is a `match`, which keeps the per-sample intersection loop free
/// of virtual calls.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
}

impl Primitive {
    /// The material bound to this primitive.
    pub fn material(&self) -> &Arc<Material> {
        match self {
            Primitive::Sphere(s) => s.material(),
            Primitive::MovingSphere(s) => s.material(),
        }
    }
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t),
            Primitive::MovingSphere(s) => s.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(time0, time1),
            Primitive::MovingSphere(s) => s.bounding_box(time0, time1),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<MovingSphere> for Primitive {
    fn from(sphere: MovingSphere) -> Self {
        Primitive::MovingSphere(sphere)
    }
}
