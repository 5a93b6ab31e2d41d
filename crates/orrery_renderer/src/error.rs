//! Error types for render configuration and execution.

use thiserror::Error;

/// A scene, camera or render setting that cannot be rendered.
///
/// These are raised before any pixel work starts and are never clamped
/// into range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("max depth must be at least 1")]
    ZeroDepth,

    #[error("aspect ratio must be positive and finite, got {0}")]
    AspectRatio(f64),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f64),

    #[error("aperture must be non-negative, got {0}")]
    Aperture(f64),

    #[error("focus distance must be positive, got {0}")]
    FocusDistance(f64),

    #[error("camera vectors must be finite")]
    NonFiniteCamera,

    #[error("camera look_from and look_at coincide or vup is parallel to the view direction")]
    DegenerateView,
}

/// Errors that can end a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("render cancelled with {rows_remaining} rows remaining")]
    Cancelled { rows_remaining: usize },
}
