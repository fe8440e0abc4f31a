use std::io;

use thiserror::Error;

/// Reasons an export is aborted. Nothing is written to the output when one of these occurs.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("A mesh cannot contain children ('{0}')")]
    MeshWithChildren(String),

    #[error("Object '{0}' has no material assigned")]
    NoMaterials(String),

    #[error("Material slot {slot} for object '{object}' has no material assigned")]
    EmptyMaterialSlot { slot: usize, object: String },

    #[error("Material '{material}' is ignored but is used by object '{object}'")]
    ExcludedMaterialUsed { material: String, object: String },

    #[error("Only {limit} vertices per mesh allowed ('{object}')")]
    VertexLimitExceeded { limit: usize, object: String },

    #[error("Mesh of object '{object}' is malformed: {reason}")]
    InvalidMesh { object: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
