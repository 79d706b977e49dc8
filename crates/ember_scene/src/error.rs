//! # Scene Error Types

use thiserror::Error;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Invalid scene configuration file.
    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
