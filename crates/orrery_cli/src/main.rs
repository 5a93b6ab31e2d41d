//! `orrery` - render a sphere scene to an image file.
//!
//! Scenes come from a JSON document (`--scene`) or a built-in preset.
//! Progress is logged while rows complete; set `RUST_LOG=debug` for
//! per-row detail.

mod output;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use orrery_renderer::{RenderConfig, Renderer};
use orrery_scene::{LoadedScene, Preset, SceneDocument};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "orrery", version, about = "CPU ray tracer for spheres")]
struct Args {
    /// Scene document (JSON) to render
    #[arg(short, long, conflicts_with = "preset")]
    scene: Option<PathBuf>,

    /// Built-in scene to render when no document is given
    #[arg(short, long, value_enum, default_value_t = PresetArg::Random)]
    preset: PresetArg,

    /// Seed for generating the random preset
    #[arg(long, default_value_t = 0)]
    scene_seed: u64,

    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for pixel sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Output image (.png, .ppm, or any format `image` knows)
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Also write the rendered scene as a JSON document
    #[arg(long)]
    save_scene: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PresetArg {
    Random,
    ThreeSpheres,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Random => Preset::Random,
            PresetArg::ThreeSpheres => Preset::ThreeSpheres,
        }
    }
}

impl Args {
    /// Apply command line overrides on top of a base configuration.
    fn override_config(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }

    fn load_scene(&self) -> Result<LoadedScene> {
        match &self.scene {
            Some(path) => {
                let mut doc = SceneDocument::load(path)
                    .with_context(|| format!("loading scene {}", path.display()))?;
                let config = self.override_config(RenderConfig::from(&doc.render));
                doc.render = (&config).into();
                doc.build()
                    .with_context(|| format!("building scene {}", path.display()))
            }
            None => {
                let preset = Preset::from(self.preset);
                let config = self.override_config(preset.default_config()?);
                let mut rng = StdRng::seed_from_u64(self.scene_seed);
                preset
                    .build(config, &mut rng)
                    .with_context(|| format!("building preset {:?}", preset))
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let scene = args.load_scene()?;

    if let Some(path) = &args.save_scene {
        SceneDocument::capture(&scene.world, &scene.camera, &scene.config)
            .save(path)
            .with_context(|| format!("saving scene {}", path.display()))?;
    }

    let renderer = Renderer::new(scene.config.clone())?;
    let progress = renderer.progress();
    let done = AtomicBool::new(false);

    let frame = thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(500));
                if done.load(Ordering::Acquire) {
                    break;
                }
                log::info!(
                    "{:5.1}% done, {} rows remaining, {:.1?} elapsed",
                    progress.fraction_done() * 100.0,
                    progress.rows_remaining(),
                    progress.elapsed()
                );
            }
        });

        let result = renderer.render(&scene.world, &scene.camera);
        done.store(true, Ordering::Release);
        result
    })?;

    output::save_frame(&frame, &args.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let args = Args::parse_from(["orrery", "--width", "64", "--samples", "3", "--seed", "9"]);
        let config = args.override_config(RenderConfig::default());

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 200);
        assert_eq!(config.samples_per_pixel, 3);
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.seed, 9);

        let args = Args::parse_from(["orrery"]);
        assert_eq!(args.override_config(RenderConfig::default()), RenderConfig::default());
    }

    #[test]
    fn test_preset_defaults_are_overridden() {
        let args = Args::parse_from([
            "orrery", "--preset", "three-spheres", "--width", "40", "--height", "30", "--samples", "2",
        ]);
        let scene = args.load_scene().unwrap();

        assert_eq!((scene.config.width, scene.config.height), (40, 30));
        assert_eq!(scene.config.samples_per_pixel, 2);
        // Untouched fields keep the preset's values
        assert_eq!(scene.config.max_depth, 50);
    }

    #[test]
    fn test_document_render_block_is_overridden() {
        let path = std::env::temp_dir().join(format!("orrery-cli-{}.json", std::process::id()));
        let mut doc = SceneDocument::default();
        doc.render = (&RenderConfig::default().with_resolution(8, 6).with_quality(4, 7).with_seed(2)).into();
        doc.save(&path).unwrap();

        let args = Args::parse_from([
            OsString::from("orrery"),
            "--scene".into(),
            path.clone().into_os_string(),
            "--max-depth".into(),
            "3".into(),
        ]);
        let scene = args.load_scene();
        std::fs::remove_file(&path).unwrap();
        let scene = scene.unwrap();

        assert_eq!((scene.config.width, scene.config.height), (8, 6));
        assert_eq!(scene.config.samples_per_pixel, 4);
        assert_eq!(scene.config.max_depth, 3);
        assert_eq!(scene.config.seed, 2);
    }

    #[test]
    fn test_scene_conflicts_with_preset() {
        let parsed = Args::try_parse_from(["orrery", "--scene", "a.json", "--preset", "random"]);
        assert!(parsed.is_err());
    }
}
