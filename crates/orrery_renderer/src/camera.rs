//! Camera for ray generation.

use crate::random::{random_in_unit_disk, random_range};
use crate::ConfigError;
use orrery_math::{Point3, Ray, Vec3};
use rand::RngCore;

/// The seven logical camera inputs plus the shutter interval.
///
/// This is the form the camera is configured and serialized in; call
/// [`CameraSettings::build`] to derive a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub aspect_ratio: f64,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
    /// Shutter open time
    pub time0: f64,
    /// Shutter close time
    pub time1: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the shutter interval used for motion blur.
    pub fn with_shutter(mut self, time0: f64, time1: f64) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Check the settings describe a usable camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let vectors_finite = self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite();
        if !vectors_finite || !self.time0.is_finite() || !self.time1.is_finite() {
            return Err(ConfigError::NonFiniteCamera);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::FieldOfView(self.vfov));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(ConfigError::AspectRatio(self.aspect_ratio));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return Err(ConfigError::Aperture(self.aperture));
        }
        if !(self.focus_dist > 0.0 && self.focus_dist.is_finite()) {
            return Err(ConfigError::FocusDistance(self.focus_dist));
        }
        Ok(())
    }

    /// Derive the camera basis and viewport.
    pub fn build(self) -> Result<Camera, ConfigError> {
        self.validate()?;

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        let w = (self.look_from - self.look_at)
            .try_normalize()
            .ok_or(ConfigError::DegenerateView)?;
        let u = self.vup.cross(w).try_normalize().ok_or(ConfigError::DegenerateView)?;
        let v = w.cross(u);

        let origin = self.look_from;
        let horizontal = self.focus_dist * viewport_width * u;
        let vertical = self.focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - self.focus_dist * w;

        Ok(Camera {
            settings: self,
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

/// Camera for generating rays into the scene.
///
/// Immutable once built and safe to share between render threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    settings: CameraSettings,
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Build a camera from its settings.
    pub fn new(settings: CameraSettings) -> Result<Self, ConfigError> {
        settings.build()
    }

    /// Generate a ray through normalized image-plane coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner of the viewport, `(1, 1)` the
    /// upper-right. The origin is jittered over the lens and the time is
    /// drawn uniformly between `time0` and `time1`, in either order. An
    /// instantaneous shutter always yields `time0`.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let time = random_range(rng, self.settings.time0, self.settings.time1);

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            time,
        )
    }

    /// The settings this camera was built from.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn lower_left_corner(&self) -> Point3 {
        self.lower_left_corner
    }

    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    pub fn vertical(&self) -> Vec3 {
        self.vertical
    }

    /// Orthonormal basis `(u, v, w)`; `w` points away from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_neg_z() -> Camera {
        CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_camera_basis() {
        let camera = looking_down_neg_z();
        let (u, v, w) = camera.basis();

        assert_eq!(camera.origin(), Vec3::ZERO);
        assert!((w - Vec3::Z).length() < 1e-12);
        assert!((u - Vec3::X).length() < 1e-12);
        assert!((v - Vec3::Y).length() < 1e-12);
        assert_eq!(camera.lens_radius(), 0.0);
    }

    #[test]
    fn test_center_ray_looks_down_neg_z() {
        let camera = looking_down_neg_z();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        let dir = ray.direction().normalize();
        assert!((dir - Vec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_corner_rays_span_field_of_view() {
        let camera = looking_down_neg_z();
        let mut rng = StdRng::seed_from_u64(42);

        // 90 degree vfov at focus distance 1: viewport is 2 units tall
        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction() - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-12);

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((upper_right.direction() - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_aperture_jitters_origin_within_lens() {
        let camera = CameraSettings::default()
            .with_lens(40.0, 2.0, 5.0)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let mut moved = false;
        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin().length() < 1.0 + 1e-12);
            assert!(ray.origin().z.abs() < 1e-12);
            moved |= ray.origin() != Vec3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_ray_time_within_shutter() {
        let camera = CameraSettings::default().with_shutter(0.25, 0.75).build().unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.6, &mut rng).time();
            assert!((0.25..0.75).contains(&time));
        }

        let instant = CameraSettings::default().with_shutter(2.0, 2.0).build().unwrap();
        assert_eq!(instant.get_ray(0.5, 0.5, &mut rng).time(), 2.0);
    }

    #[test]
    fn test_reversed_shutter_still_samples_interval() {
        let camera = CameraSettings::default().with_shutter(1.0, 0.0).build().unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let times: Vec<f64> = (0..100).map(|_| camera.get_ray(0.5, 0.5, &mut rng).time()).collect();
        assert!(times.iter().all(|t| (0.0..=1.0).contains(t)));
        assert!(times.iter().any(|&t| t != 1.0));
        assert!(times.iter().any(|&t| t < 0.5) && times.iter().any(|&t| t > 0.5));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let base = CameraSettings::default();

        assert_eq!(
            base.with_lens(0.0, 0.0, 1.0).build(),
            Err(ConfigError::FieldOfView(0.0))
        );
        assert_eq!(
            base.with_lens(90.0, -1.0, 1.0).build(),
            Err(ConfigError::Aperture(-1.0))
        );
        assert_eq!(
            base.with_lens(90.0, 0.0, 0.0).build(),
            Err(ConfigError::FocusDistance(0.0))
        );
        assert_eq!(
            base.with_aspect_ratio(-2.0).build(),
            Err(ConfigError::AspectRatio(-2.0))
        );
        assert_eq!(
            base.with_position(Vec3::ONE, Vec3::ONE, Vec3::Y).build(),
            Err(ConfigError::DegenerateView)
        );
        assert_eq!(
            base.with_position(Vec3::ZERO, Vec3::Y, Vec3::Y).build(),
            Err(ConfigError::DegenerateView)
        );
    }
}
