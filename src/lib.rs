// THEORY:
// This file is the main entry point for the `shape_containment` library crate.
// The public surface is the `Scene` (ordered shapes in, nesting relation out) and
// its parallel counterpart. The raster building blocks in `core_modules` (shapes,
// canvas, color histogram, palette, containment test) are public as well, so a
// presentation layer can render shapes with exactly the transform the analyzer uses.

pub mod core_modules;
pub mod error;
pub mod parallel_scene;
pub mod scene;

pub use core_modules::shape::{Geometry, Point, Shape, ShapeId, ShapeKind};
pub use error::{Error, Result};
pub use parallel_scene::ParallelAnalyzer;
pub use scene::{Scene, SceneConfig, ShapeReport};
