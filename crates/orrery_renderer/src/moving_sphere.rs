//! Sphere whose center moves linearly during the shutter interval.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::sphere::{hit_sphere, sphere_box};
use crate::Material;
use orrery_math::{Aabb, Interval, Point3, Ray};

/// A sphere travelling from `center0` at `time0` to `center1` at `time1`.
///
/// Times outside `[time0, time1]` extrapolate along the same line; the
/// center is not clamped.
#[derive(Debug, Clone)]
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Point3,
        center1: Point3,
        time0: f64,
        time1: f64,
        radius: f64,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center of the sphere at `time`.
    pub fn center(&self, time: f64) -> Point3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    pub fn center0(&self) -> Point3 {
        self.center0
    }

    pub fn center1(&self) -> Point3 {
        self.center1
    }

    pub fn time0(&self) -> f64 {
        self.time0
    }

    pub fn time1(&self) -> f64 {
        self.time1
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center(ray.time()), self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        let box0 = sphere_box(self.center(time0), self.radius);
        let box1 = sphere_box(self.center(time1), self.radius);
        Aabb::surrounding(&box0, &box1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use orrery_math::Vec3;

    fn material() -> Arc<Material> {
        Arc::new(Lambertian::new(Vec3::new(0.2, 0.4, 0.6)).into())
    }

    #[test]
    fn test_stationary_matches_static_sphere() {
        let center = Vec3::new(0.3, -0.2, -2.0);
        let moving = MovingSphere::new(center, center, 0.0, 1.0, 0.7, material());
        let fixed = Sphere::new(center, 0.7, material());

        for &time in &[0.0, 0.25, 1.0, 3.0] {
            let ray = Ray::new(Vec3::ZERO, Vec3::new(0.1, 0.0, -1.0), time);
            let window = Interval::new(0.001, f64::INFINITY);

            let a = moving.hit(&ray, window).unwrap();
            let b = fixed.hit(&ray, window).unwrap();
            assert_eq!(a.t, b.t);
            assert_eq!(a.p, b.p);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.front_face, b.front_face);
        }
    }

    #[test]
    fn test_center_interpolates_and_extrapolates() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.0, 1.0, 0.5, material());

        assert_eq!(sphere.center(0.0), Vec3::ZERO);
        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sphere.center(1.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(sphere.center(2.0), Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_hit_uses_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.0, 5.0, -2.0),
            0.0,
            1.0,
            0.5,
            material(),
        );
        let window = Interval::new(0.001, f64::INFINITY);

        let early = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        assert!(sphere.hit(&early, window).is_some());

        let late = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 1.0);
        assert!(sphere.hit(&late, window).is_none());
    }

    #[test]
    fn test_negative_radius_keeps_surface() {
        let moving = MovingSphere::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -3.0), 0.0, 1.0, -0.5, material());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.5);

        let rec = moving.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-9);
        assert!(!rec.front_face);

        let bbox = moving.bounding_box(0.0, 1.0);
        assert_eq!(bbox.min(), Vec3::new(-0.5, -0.5, -3.5));
        assert_eq!(bbox.max(), Vec3::new(0.5, 0.5, -2.5));
    }

    #[test]
    fn test_bounding_box_covers_both_ends() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 0.0, 1.0, 1.0, material());
        let bbox = sphere.bounding_box(0.0, 1.0);

        assert_eq!(bbox.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(4.0, 1.0, 1.0));
    }
}
