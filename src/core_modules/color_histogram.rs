// THEORY:
// The `ColorHistogram` is the measuring instrument of the containment engine. The
// analyzer never asks a shape where it is; it only asks the canvas which colors
// survived a sequence of renders and how many pixels each one covers.
//
// Key principles:
// 1.  **Exact Counts**: every query is a full width x height scan. There is no
//     sampling, because the decision rule compares counts for equality.
// 2.  **Pure Reads**: scanning never mutates the canvas. A histogram is a snapshot;
//     drawing afterwards does not update it.
// 3.  **Stateless Utility**: the free functions in `color_histogram` are for one-off
//     questions. `ColorHistogram::from_canvas` captures every count in one pass
//     when several questions are asked of the same snapshot.

use crate::core_modules::canvas::Canvas;
use image::Rgb;
use std::collections::HashMap;

pub mod color_histogram {
    use super::*;
    use std::collections::HashSet;

    /// Number of unique colors present across the whole canvas.
    pub fn distinct_colors(canvas: &Canvas) -> usize {
        let mut seen: HashSet<[u8; 3]> = HashSet::new();
        for pixel in canvas.image().pixels() {
            seen.insert(pixel.0);
        }
        seen.len()
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count_color(canvas: &Canvas, color: Rgb<u8>) -> usize {
        canvas.image().pixels().filter(|pixel| **pixel == color).count()
    }
}

/// Per-color pixel counts of a canvas snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorHistogram {
    counts: HashMap<[u8; 3], usize>,
}

impl ColorHistogram {
    pub fn from_canvas(canvas: &Canvas) -> Self {
        let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
        for pixel in canvas.image().pixels() {
            *counts.entry(pixel.0).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn distinct_colors(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, color: Rgb<u8>) -> usize {
        self.counts.get(&color.0).copied().unwrap_or(0)
    }

    pub fn contains(&self, color: Rgb<u8>) -> bool {
        self.count(color) > 0
    }
}
