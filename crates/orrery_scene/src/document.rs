//! JSON scene documents.
//!
//! A document holds plain data: the camera inputs, render settings, a table
//! of named materials and a list of spheres that refer to materials by name.
//! Materials are shared on load: every object naming the same entry gets a
//! clone of one `Arc<Material>`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use orrery_math::{Color, Point3, Vec3};
use orrery_renderer::{
    Camera, CameraSettings, Dielectric, HittableList, Lambertian, Material, Metal, MovingSphere,
    Primitive, RenderConfig, Sphere,
};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Camera inputs as stored in a document.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CameraDesc {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    pub vfov: f64,
    pub aspect_ratio: f64,
    #[serde(default)]
    pub aperture: f64,
    pub focus_dist: f64,
    #[serde(default)]
    pub time0: f64,
    #[serde(default)]
    pub time1: f64,
}

impl From<&CameraSettings> for CameraDesc {
    fn from(s: &CameraSettings) -> Self {
        Self {
            look_from: s.look_from,
            look_at: s.look_at,
            vup: s.vup,
            vfov: s.vfov,
            aspect_ratio: s.aspect_ratio,
            aperture: s.aperture,
            focus_dist: s.focus_dist,
            time0: s.time0,
            time1: s.time1,
        }
    }
}

impl From<&CameraDesc> for CameraSettings {
    fn from(d: &CameraDesc) -> Self {
        CameraSettings {
            look_from: d.look_from,
            look_at: d.look_at,
            vup: d.vup,
            vfov: d.vfov,
            aspect_ratio: d.aspect_ratio,
            aperture: d.aperture,
            focus_dist: d.focus_dist,
            time0: d.time0,
            time1: d.time1,
        }
    }
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self::from(&CameraSettings::default())
    }
}

/// Render settings as stored in a document.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RenderDesc {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
}

impl Default for RenderDesc {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderDesc {
    fn from(c: &RenderConfig) -> Self {
        Self {
            width: c.width,
            height: c.height,
            samples_per_pixel: c.samples_per_pixel,
            max_depth: c.max_depth,
            seed: c.seed,
        }
    }
}

impl From<&RenderDesc> for RenderConfig {
    fn from(d: &RenderDesc) -> Self {
        RenderConfig {
            width: d.width,
            height: d.height,
            samples_per_pixel: d.samples_per_pixel,
            max_depth: d.max_depth,
            seed: d.seed,
        }
    }
}

/// A material table entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian { albedo: Color },
    Metal { albedo: Color, fuzz: f64 },
    Dielectric { ior: f64 },
}

impl MaterialDesc {
    /// Describe a live material.
    pub fn describe(material: &Material) -> Self {
        match material {
            Material::Lambertian(m) => MaterialDesc::Lambertian { albedo: m.albedo() },
            Material::Metal(m) => MaterialDesc::Metal {
                albedo: m.albedo(),
                fuzz: m.fuzz(),
            },
            Material::Dielectric(m) => MaterialDesc::Dielectric { ior: m.ior() },
        }
    }

    /// Build the material, rejecting out-of-range parameters.
    pub fn to_material(&self, name: &str) -> SceneResult<Material> {
        let invalid = |reason: String| SceneError::InvalidMaterial {
            name: name.to_string(),
            reason,
        };

        match *self {
            MaterialDesc::Lambertian { albedo } => {
                if !albedo.is_finite() {
                    return Err(invalid("albedo must be finite".into()));
                }
                Ok(Lambertian::new(albedo).into())
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                if !albedo.is_finite() {
                    return Err(invalid("albedo must be finite".into()));
                }
                if !(0.0..=1.0).contains(&fuzz) {
                    return Err(invalid(format!("fuzz must be in [0, 1], got {}", fuzz)));
                }
                Ok(Metal::new(albedo, fuzz).into())
            }
            MaterialDesc::Dielectric { ior } => {
                if !(ior > 0.0 && ior.is_finite()) {
                    return Err(invalid(format!("index of refraction must be positive, got {}", ior)));
                }
                Ok(Dielectric::new(ior).into())
            }
        }
    }
}

/// A sphere entry, naming its material.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: Point3,
        radius: f64,
        material: String,
    },
    MovingSphere {
        center0: Point3,
        center1: Point3,
        time0: f64,
        time1: f64,
        radius: f64,
        material: String,
    },
}

impl ObjectDesc {
    pub fn material_name(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. } | ObjectDesc::MovingSphere { material, .. } => material,
        }
    }

    fn validate(&self, index: usize) -> SceneResult<()> {
        let invalid = |reason: &str| SceneError::InvalidObject {
            index,
            reason: reason.to_string(),
        };

        let radius = match self {
            ObjectDesc::Sphere { center, radius, .. } => {
                if !center.is_finite() {
                    return Err(invalid("center must be finite"));
                }
                *radius
            }
            ObjectDesc::MovingSphere {
                center0,
                center1,
                time0,
                time1,
                radius,
                ..
            } => {
                if !center0.is_finite() || !center1.is_finite() {
                    return Err(invalid("centers must be finite"));
                }
                if !time0.is_finite() || !time1.is_finite() || time1 < time0 {
                    return Err(invalid("time interval must be finite with time0 <= time1"));
                }
                *radius
            }
        };

        // Negative radii are hollow shells with inward normals
        if radius == 0.0 || !radius.is_finite() {
            return Err(invalid("radius must be finite and non-zero"));
        }
        Ok(())
    }
}

/// A complete scene description.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SceneDocument {
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub render: RenderDesc,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

/// A scene ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub world: HittableList,
    pub camera: Camera,
    pub config: RenderConfig,
}

impl SceneDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a document from disk.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Write the document to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> SceneResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Saved scene to {}", path.display());
        Ok(())
    }

    /// Encode a live scene.
    ///
    /// Materials shared between primitives (same `Arc`) become a single
    /// table entry.
    pub fn capture(world: &HittableList, camera: &Camera, config: &RenderConfig) -> Self {
        let mut materials = BTreeMap::new();
        let mut names: HashMap<*const Material, String> = HashMap::new();

        let mut name_for = |material: &Arc<Material>| -> String {
            names
                .entry(Arc::as_ptr(material))
                .or_insert_with(|| {
                    let name = format!("material_{}", materials.len());
                    materials.insert(name.clone(), MaterialDesc::describe(material));
                    name
                })
                .clone()
        };

        let objects = world
            .objects()
            .iter()
            .map(|object| match object {
                Primitive::Sphere(s) => ObjectDesc::Sphere {
                    center: s.center(),
                    radius: s.radius(),
                    material: name_for(s.material()),
                },
                Primitive::MovingSphere(s) => ObjectDesc::MovingSphere {
                    center0: s.center0(),
                    center1: s.center1(),
                    time0: s.time0(),
                    time1: s.time1(),
                    radius: s.radius(),
                    material: name_for(s.material()),
                },
            })
            .collect();

        Self {
            camera: CameraDesc::from(camera.settings()),
            render: RenderDesc::from(config),
            materials,
            objects,
        }
    }

    /// Validate the document and build the renderer types.
    pub fn build(&self) -> SceneResult<LoadedScene> {
        let config = RenderConfig::from(&self.render);
        config.validate()?;
        let camera = CameraSettings::from(&self.camera).build()?;

        let mut materials: HashMap<&str, Arc<Material>> = HashMap::with_capacity(self.materials.len());
        for (name, desc) in &self.materials {
            materials.insert(name.as_str(), Arc::new(desc.to_material(name)?));
        }

        let mut world = HittableList::new();
        for (index, desc) in self.objects.iter().enumerate() {
            desc.validate(index)?;
            let material = materials
                .get(desc.material_name())
                .cloned()
                .ok_or_else(|| SceneError::UnknownMaterial {
                    index,
                    name: desc.material_name().to_string(),
                })?;

            match *desc {
                ObjectDesc::Sphere { center, radius, .. } => {
                    world.add(Sphere::new(center, radius, material));
                }
                ObjectDesc::MovingSphere {
                    center0,
                    center1,
                    time0,
                    time1,
                    radius,
                    ..
                } => {
                    world.add(MovingSphere::new(center0, center1, time0, time1, radius, material));
                }
            }
        }

        log::info!(
            "Built scene with {} objects sharing {} materials",
            world.len(),
            materials.len()
        );

        Ok(LoadedScene { world, camera, config })
    }
}
