use parry3d::shape::TriMeshBuilderError;
use thiserror::Error;

/// Rejected tunable table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("crouching height {crouching} must be below standing height {standing}")]
    CrouchNotLower { crouching: f32, standing: f32 },

    #[error("max walkable slope must be between 0 and 90 degrees, got {0}")]
    SlopeOutOfRange(f32),

    #[error("failed to parse tunables: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Geometry that a collision backend refused to accept.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("box has non-positive extent: {0:?}")]
    DegenerateBox([f32; 3]),

    #[error("collision mesh has no triangles")]
    EmptyMesh,

    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("invalid triangle mesh: {0}")]
    Mesh(#[from] TriMeshBuilderError),
}
