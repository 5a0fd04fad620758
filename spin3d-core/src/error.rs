//! Error types for the outer surfaces of the viewer
//!
//! The per-frame pipeline never fails; these errors come from checked mesh
//! construction, input delivery and configuration loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Spin3dError {
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("face {face} has {len} vertices, at least 3 are required")]
    DegenerateFace { face: usize, len: usize },

    #[error("input queue is full ({capacity} pending commands)")]
    QueueFull { capacity: usize },

    #[error("input carries a non-finite value: {0}")]
    NonFiniteInput(String),

    #[error("unknown render mode '{0}', expected 'solid' or 'wire'")]
    UnknownMode(String),

    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Spin3dError>;
