//! Materials describing how light scatters off surfaces.

use crate::hittable::HitRecord;
use crate::random::{random_in_unit_sphere, random_unit_vector};
use orrery_math::{near_zero, Color, Ray, Vec3};
use rand::{Rng, RngCore};

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Color multiplier applied to light arriving along `scattered`
    pub attenuation: Color,
    /// Outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for surfaces that can re-emit an incoming ray.
pub trait Scatter: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Every material kind a primitive can carry.
///
/// Shared between primitives through `Arc<Material>` and never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Scatter for Material {
    #[inline]
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Scatter for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut direction = reflect(ray_in.direction(), rec.normal);
        if self.fuzz > 0.0 {
            direction += self.fuzz * random_in_unit_sphere(rng);
        }

        // Rays perturbed below the surface are absorbed
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f64 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().try_normalize().unwrap_or(-rec.normal);
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>() {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, normal: Vec3, material: &'a Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, normal, material)
    }

    #[test]
    fn test_lambertian_attenuation_is_albedo() {
        let albedo = Color::new(0.8, 0.1, 0.1);
        let mat = Material::from(Lambertian::new(albedo));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z, 0.25);
            let rec = record(&ray, Vec3::Z, &mat);
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();

            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert_eq!(result.scattered.time(), 0.25);
            assert!(!near_zero(result.scattered.direction()));
        }
    }

    #[test]
    fn test_metal_without_fuzz_is_exact_mirror() {
        let mat = Material::from(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        let incoming = Vec3::new(1.0, -2.0, 0.5);
        let ray = Ray::new(Vec3::new(-1.0, 2.0, 0.0), incoming, 0.0);
        let normal = Vec3::Y;
        let rec = record(&ray, normal, &mat);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = incoming - 2.0 * incoming.dot(normal) * normal;

        assert_eq!(result.scattered.direction(), expected);
        assert_eq!(result.attenuation, Color::new(0.7, 0.6, 0.5));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_metal_absorbs_rays_scattered_into_surface() {
        let mat = Material::from(Metal::new(Color::ONE, 1.0));
        let mut rng = StdRng::seed_from_u64(3);

        // Grazing ray: mirror direction lies almost in the surface plane,
        // so a full-fuzz perturbation pushes a good share of samples below it.
        let ray = Ray::new(Vec3::new(-1.0, 1e-3, 0.0), Vec3::new(1.0, -1e-3, 0.0), 0.0);
        let rec = record(&ray, Vec3::Y, &mat);

        let mut absorbed = 0;
        for _ in 0..200 {
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_attenuation_is_white() {
        let mat = Material::from(Dielectric::new(1.5));
        let mut rng = StdRng::seed_from_u64(4);

        for i in 0..200 {
            let angle = i as f64 / 200.0 * std::f64::consts::FRAC_PI_2;
            let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), dir, 0.0);
            let normal = if i % 2 == 0 { Vec3::Y } else { Vec3::NEG_Y };
            let rec = record(&ray, normal, &mat);

            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Material::from(Dielectric::new(1.5));
        let mut rng = StdRng::seed_from_u64(5);

        // Leaving glass at a steep angle: 1.5 * sin(60deg) > 1
        let angle = 60f64.to_radians();
        let dir = Vec3::new(angle.sin(), angle.cos(), 0.0);
        let ray = Ray::new(Vec3::ZERO, dir, 0.0);
        // Outward normal along +Y, ray travels outward, so this is a back face
        let rec = record(&ray, Vec3::Y, &mat);
        assert!(!rec.front_face);

        for _ in 0..20 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(dir, rec.normal);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_refract_head_on_passes_straight_through() {
        let out = refract(Vec3::NEG_Y, Vec3::Y, 1.0 / 1.5);
        assert!((out - Vec3::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_schlick_bounds() {
        assert!((Dielectric::reflectance(1.0, 1.0)).abs() < 1e-12);
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-12);
    }
}
