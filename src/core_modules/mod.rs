pub mod canvas;
pub mod color_histogram;
pub mod containment;
pub mod palette;
pub mod shape;
