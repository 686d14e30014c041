//! Error types for the containment engine.
//!
//! Rasterization and the containment decision rule are total, so errors only
//! come from configuration, scene bookkeeping, name parsing and the parallel
//! worker pool.

use crate::core_modules::shape::ShapeId;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured canvas has a zero dimension.
    #[error("canvas dimensions must be non-zero, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// A shape with this id is already part of the scene.
    #[error("shape id {0} is already present in the scene")]
    DuplicateShapeId(ShapeId),

    /// A shape name did not match any known kind.
    #[error("unknown shape kind: '{0}' (expected circle, square, rectangle, triangle or donut)")]
    UnknownShapeKind(String),

    /// A parallel comparison task panicked or was cancelled.
    #[error("containment worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
