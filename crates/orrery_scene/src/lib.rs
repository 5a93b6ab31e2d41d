//! Orrery scenes - scene documents and preset scenes.
//!
//! This crate provides:
//!
//! - **Scene documents**: a JSON description of camera, render settings,
//!   named materials and spheres, convertible to and from live renderer types
//! - **Presets**: the built-in scenes the command line can render without a file
//!
//! # Example
//!
//! ```ignore
//! use orrery_scene::SceneDocument;
//! use orrery_renderer::Renderer;
//!
//! let scene = SceneDocument::load("scene.json")?.build()?;
//! let frame = Renderer::new(scene.config)?.render(&scene.world, &scene.camera)?;
//! ```

mod document;
mod error;
pub mod presets;

pub use document::{CameraDesc, LoadedScene, MaterialDesc, ObjectDesc, RenderDesc, SceneDocument};
pub use error::{SceneError, SceneResult};
pub use presets::Preset;
