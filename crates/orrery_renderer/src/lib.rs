//! Orrery renderer - CPU ray tracing of spheres.
//!
//! A Monte Carlo ray tracer for analytic spheres (static and moving) with
//! diffuse, metal and glass materials, lit only by a sky gradient.
//!
//! Data flow for one sample: [`Camera::get_ray`] produces a ray,
//! [`ray_color`] asks the [`HittableList`] for the nearest hit, the hit
//! [`Material`] scatters, and the recursion bottoms out at the sky, an
//! absorbing surface or the depth limit. [`Renderer`] fans that out over
//! image rows with rayon.

mod camera;
mod error;
mod hittable;
mod material;
mod moving_sphere;
mod primitive;
mod progress;
mod random;
mod renderer;
mod sphere;

pub use camera::{Camera, CameraSettings};
pub use error::{ConfigError, RenderError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, Scatter, ScatterResult};
pub use moving_sphere::MovingSphere;
pub use primitive::Primitive;
pub use progress::RenderProgress;
pub use random::{random_in_unit_disk, random_in_unit_sphere, random_range, random_unit_vector};
pub use renderer::{
    pixel_to_rgba, ray_color, render_pixel, sky_color, Frame, RenderConfig, Renderer, T_MIN,
};
pub use sphere::Sphere;

/// Re-export the math types the renderer API is written in.
pub use orrery_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
