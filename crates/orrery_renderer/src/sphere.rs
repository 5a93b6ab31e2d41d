//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use orrery_math::{Aabb, Interval, Point3, Ray, Vec3};

/// A sphere with a fixed center.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. A negative radius keeps the same surface but
    /// flips the outward normal inward, which makes hollow glass shells.
    pub fn new(center: Point3, radius: f64, material: Arc<Material>) -> Self {
        let bbox = sphere_box(center, radius);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Aabb {
        self.bbox
    }
}

/// Box around a sphere at a given center.
pub(crate) fn sphere_box(center: Point3, radius: f64) -> Aabb {
    let rvec = Vec3::splat(radius.abs());
    Aabb::from_points(center - rvec, center + rvec)
}

/// Solve `|O + tD - C|^2 = r^2` and keep the nearest root inside `ray_t`.
pub(crate) fn hit_sphere<'a>(
    center: Point3,
    radius: f64,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = ray.origin() - center;
    let a = ray.direction().length_squared();
    let half_b = oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Near root first, far root as fallback
    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    // Dividing by the signed radius flips the normal of a negative sphere.
    // A zero radius leaves no usable normal; face the incoming ray instead.
    let outward_normal = ((ray.at(root) - center) / radius)
        .try_normalize()
        .unwrap_or_else(|| -ray.direction().normalize_or_zero());
    Some(HitRecord::new(ray, root, outward_normal, material))
}
