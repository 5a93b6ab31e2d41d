//! Built-in scenes.

use std::sync::Arc;

use orrery_math::{Color, Point3, Vec3};
use orrery_renderer::{
    random_range, CameraSettings, Dielectric, HittableList, Lambertian, Material, Metal,
    MovingSphere, RenderConfig, Sphere,
};
use rand::{Rng, RngCore};

use crate::{LoadedScene, SceneResult};

/// Scenes that can be rendered without a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Field of small random spheres around three large ones, with motion blur
    Random,
    /// Ground plus diffuse, glass and metal spheres in a row
    ThreeSpheres,
}

impl Preset {
    /// Default render settings for the preset.
    pub fn default_config(self) -> SceneResult<RenderConfig> {
        let config = match self {
            Preset::Random => RenderConfig::from_aspect_ratio(300, 3.0 / 2.0)?.with_quality(50, 20),
            Preset::ThreeSpheres => RenderConfig::from_aspect_ratio(400, 16.0 / 9.0)?.with_quality(100, 50),
        };
        Ok(config)
    }

    /// Build the preset for the given render settings.
    ///
    /// `rng` only drives scene generation; render sampling uses
    /// `config.seed`.
    pub fn build(self, config: RenderConfig, rng: &mut dyn RngCore) -> SceneResult<LoadedScene> {
        config.validate()?;
        let aspect_ratio = config.aspect_ratio();

        let (world, camera) = match self {
            Preset::Random => (random_scene(rng), random_scene_camera(aspect_ratio)),
            Preset::ThreeSpheres => (three_spheres(), three_spheres_camera(aspect_ratio)),
        };

        Ok(LoadedScene {
            world,
            camera: camera.build()?,
            config,
        })
    }
}

fn shared(material: impl Into<Material>) -> Arc<Material> {
    Arc::new(material.into())
}

/// The random sphere field.
///
/// Small diffuse spheres bounce upward during the shutter so they blur.
pub fn random_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    world.add(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        shared(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, random_range(rng, 0.0, 0.5), 0.0);
                world.add(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    shared(Lambertian::new(albedo)),
                ));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = random_range(rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, shared(Metal::new(albedo, fuzz))));
            } else {
                // Glass
                world.add(Sphere::new(center, 0.2, shared(Dielectric::new(1.5))));
            }
        }
    }

    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, shared(Dielectric::new(1.5))));
    world.add(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        shared(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        shared(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    log::info!("Generated random scene with {} spheres", world.len());
    world
}

/// Camera for [`random_scene`]: wide shot from the side with a shallow lens.
pub fn random_scene_camera(aspect_ratio: f64) -> CameraSettings {
    CameraSettings::default()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(aspect_ratio)
        .with_shutter(0.0, 1.0)
}

/// Three spheres resting on a large ground sphere.
pub fn three_spheres() -> HittableList {
    let mut world = HittableList::new();

    world.add(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        shared(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    ));
    world.add(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        shared(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
    ));
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, shared(Dielectric::new(1.5))));
    world.add(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        shared(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0)),
    ));

    world
}

/// Camera for [`three_spheres`], looking down -Z from the origin.
pub fn three_spheres_camera(aspect_ratio: f64) -> CameraSettings {
    CameraSettings::default()
        .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0)
        .with_aspect_ratio(aspect_ratio)
}

fn random_color(rng: &mut dyn RngCore, min: f64, max: f64) -> Color {
    Color::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}
