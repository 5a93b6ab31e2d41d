use orrery_renderer::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("object {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("material '{name}': {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
