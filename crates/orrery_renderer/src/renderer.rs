//! Core ray tracing loop.
//!
//! Implements Monte Carlo ray tracing with:
//! - Recursive ray evaluation with a bounce budget
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma-2 correction and 8-bit quantization
//! - Row-parallel rendering with rayon

use std::sync::Arc;

use crate::material::Scatter;
use crate::{Camera, ConfigError, Hittable, RenderError, RenderProgress};
use orrery_math::{lerp, Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

/// Lower bound of the hit window for every traced ray.
///
/// Keeps re-emitted rays from hitting the surface they start on.
pub const T_MIN: f64 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; each row derives its own stream from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
            samples_per_pixel: 50,
            max_depth: 20,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Config with the height derived from a width and aspect ratio.
    ///
    /// Fails when the ratio is not positive and finite, or when the derived
    /// height does not fit in a `u32`.
    pub fn from_aspect_ratio(width: u32, aspect_ratio: f64) -> Result<Self, ConfigError> {
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            return Err(ConfigError::AspectRatio(aspect_ratio));
        }
        let height = width as f64 / aspect_ratio;
        if height >= u32::MAX as f64 {
            return Err(ConfigError::AspectRatio(aspect_ratio));
        }

        Ok(Self {
            width,
            height: height as u32,
            ..Default::default()
        })
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// Terminates with black once the bounce budget is spent or a material
/// absorbs the ray, and with the sky gradient when the ray escapes.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return sky_color(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Vertical white-to-blue gradient; the only light in the scene.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let t = 0.5 * (unit_direction.y + 1.0);
    lerp(Color::ONE, Color::new(0.5, 0.7, 1.0), t)
}

/// Average `samples_per_pixel` jittered samples for pixel `(i, j)`.
///
/// `j` counts rows from the bottom of the image, matching the camera's
/// lower-left viewport origin.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let u_scale = config.width.saturating_sub(1).max(1) as f64;
    let v_scale = config.height.saturating_sub(1).max(1) as f64;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let u = (i as f64 + rng.gen::<f64>()) / u_scale;
        let v = (j as f64 + rng.gen::<f64>()) / v_scale;
        let ray = camera.get_ray(u, v, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel as f64
}

/// Gamma-correct, clamp to [0, 0.999] and quantize an averaged linear color.
pub fn pixel_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.0, 0.999);
    let channel = |linear: f64| -> u8 {
        let gamma = if linear > 0.0 { linear.sqrt() } else { 0.0 };
        (256.0 * intensity.clamp(gamma)) as u8
    };
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// A finished image: RGBA8, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Create a fully transparent black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// RGBA of the pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[start..start + 4]);
        rgba
    }

    /// Raw bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

/// Parallel renderer over image rows.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    progress: Arc<RenderProgress>,
}

impl Renderer {
    /// Create a renderer, rejecting unusable configurations up front.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            progress: Arc::new(RenderProgress::new()),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Shared progress handle, for polling and cancellation.
    pub fn progress(&self) -> Arc<RenderProgress> {
        Arc::clone(&self.progress)
    }

    /// Render the scene to a frame.
    ///
    /// Rows run in parallel, each with its own generator seeded from
    /// `(config.seed, row)`, so the result depends only on the inputs and
    /// not on thread scheduling.
    pub fn render(&self, world: &dyn Hittable, camera: &Camera) -> Result<Frame, RenderError> {
        let config = &self.config;
        let width = config.width;
        let height = config.height;

        let camera_aspect = camera.settings().aspect_ratio;
        if (camera_aspect - config.aspect_ratio()).abs() > 1e-2 {
            log::warn!(
                "Camera aspect ratio {:.3} does not match image {}x{}, output will be stretched",
                camera_aspect,
                width,
                height
            );
        }

        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}",
            width,
            height,
            config.samples_per_pixel,
            config.max_depth
        );

        let progress = &self.progress;
        progress.begin(height as usize);
        let report_every = (height as usize / 10).max(1);

        let mut frame = Frame::new(width, height);
        frame
            .pixels
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(row, out)| {
                if progress.is_cancelled() {
                    return;
                }

                // Output row 0 is the top of the image
                let j = height - 1 - row as u32;
                let mut rng = StdRng::seed_from_u64(row_seed(config.seed, j));

                for (i, px) in out.chunks_exact_mut(4).enumerate() {
                    let color = render_pixel(camera, world, i as u32, j, config, &mut rng);
                    px.copy_from_slice(&pixel_to_rgba(color));
                }

                let remaining = progress.finish_row();
                if remaining % report_every == 0 {
                    log::debug!("Scanlines remaining: {}", remaining);
                }
            });

        let rows_remaining = progress.rows_remaining();
        if progress.is_cancelled() && rows_remaining > 0 {
            log::warn!("Render cancelled with {} rows remaining", rows_remaining);
            return Err(RenderError::Cancelled { rows_remaining });
        }

        log::info!("Rendered in {:?}", progress.elapsed());
        Ok(frame)
    }
}

/// Per-row seed, spread so adjacent rows get unrelated streams.
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
