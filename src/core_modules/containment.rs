// THEORY:
// The `containment` module is the analytical heart of the engine. It decides whether
// one shape visually encloses another using nothing but raster evidence: shapes are
// painted onto a disposable scratch canvas and the surviving colors are counted.
//
// Key architectural principles & algorithm steps:
// 1.  **Overlay Test**: the newest shape `S` is painted first, the candidate
//     container `C` on top. If exactly two colors remain (the background and `C`'s
//     fill), every pixel of `S` was overwritten by `C`, so `S` lies within `C`'s
//     silhouette. The draw order is part of the rule.
// 2.  **Hole Test**: a donut clears its center back to the background, so the
//     overlay cannot tell "S sits in the ring" from "S sits in the hole". For a
//     donut that passes the overlay test, the canvas is cleared, `S` is painted
//     alone and its pixel count recorded, then only the hole is painted in the
//     donut's fill. `S` is enclosed by the ring when a third color is still
//     present and the count of `S` pixels did not change.
// 3.  **Empty Candidates**: a shape that paints no pixels (zero size, collinear
//     vertices, or entirely off the buffer) leaves the overlay with nothing to
//     compare. It is enclosed exactly when its anchor point lands on the
//     container's fill in the overlay, which also places an anchor inside a
//     donut's hole outside the donut.
// 4.  **Newest Only**: each analysis asks "is the newest shape inside an earlier
//     one?" for every earlier shape independently. Earlier shapes were already
//     checked against everything that existed when they were added, so the reverse
//     question is never asked. Nesting is not inferred transitively; every pair is
//     tested on its own pixels.
// 5.  **Separated Relation**: geometry never stores back-references. The relation
//     is an append-only adjacency structure keyed by `ShapeId`, kept in both
//     directions for `contains` and `contained_by` queries.

use crate::core_modules::canvas::Canvas;
use crate::core_modules::color_histogram::ColorHistogram;
use crate::core_modules::color_histogram::color_histogram::count_color;
use crate::core_modules::shape::{Hole, Shape, ShapeId};
use crate::error::Result;
use crate::scene::SceneConfig;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

pub mod containment_test {
    use super::*;

    /// Decides from raster evidence whether `container` encloses `candidate`.
    /// Each call owns its scratch canvas, so calls are independent of each other.
    pub fn encloses(config: &SceneConfig, container: &Shape, candidate: &Shape) -> bool {
        if container.id() == candidate.id() {
            return false;
        }

        let mut canvas = config.scratch_canvas();
        canvas.draw(candidate, None);
        let painted = count_color(&canvas, candidate.fill());
        canvas.draw(container, None);

        if painted == 0 {
            let under_anchor = canvas.pixel_at(candidate.geometry().anchor());
            trace!(
                "{} paints nothing, anchor under {} reads {:?}",
                candidate.id(),
                container.id(),
                under_anchor
            );
            return under_anchor == Some(container.fill());
        }

        let overlay = ColorHistogram::from_canvas(&canvas);
        trace!(
            "overlay of {} under {}: {} distinct colors",
            candidate.id(),
            container.id(),
            overlay.distinct_colors()
        );

        // A container that painted nothing leaves no evidence of enclosing anything.
        if overlay.distinct_colors() != 2 || !overlay.contains(container.fill()) {
            return false;
        }

        match container.hole() {
            None => true,
            Some(hole) => sits_in_ring(&mut canvas, &hole, candidate),
        }
    }

    /// Second pass for donuts, reusing the comparison's canvas.
    fn sits_in_ring(canvas: &mut Canvas, hole: &Hole, candidate: &Shape) -> bool {
        canvas.clear();
        canvas.draw(candidate, None);
        let baseline = count_color(canvas, candidate.fill());

        canvas.draw_hole(hole, None);
        let filled = ColorHistogram::from_canvas(canvas);
        let remaining = filled.count(candidate.fill());
        trace!(
            "hole test for {}: baseline {} px, after {} px, {} distinct colors",
            candidate.id(),
            baseline,
            remaining,
            filled.distinct_colors()
        );

        filled.distinct_colors() > 2 && remaining == baseline
    }
}

/// Append-only containment graph: container id -> ids of shapes it encloses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainmentRelation {
    contains: HashMap<ShapeId, BTreeSet<ShapeId>>,
    contained_by: HashMap<ShapeId, BTreeSet<ShapeId>>,
}

impl ContainmentRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `container contains inner`. Self-edges are refused.
    /// Returns true when the edge was not known before.
    pub fn record(&mut self, container: ShapeId, inner: ShapeId) -> bool {
        if container == inner {
            return false;
        }
        let inserted = self.contains.entry(container).or_default().insert(inner);
        self.contained_by.entry(inner).or_default().insert(container);
        inserted
    }

    /// Ids of the shapes enclosed by `id`.
    pub fn contains(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.contains.get(&id).cloned().unwrap_or_default()
    }

    /// Ids of the shapes that enclose `id`.
    pub fn contained_by(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.contained_by.get(&id).cloned().unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.contains.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    pub fn clear(&mut self) {
        self.contains.clear();
        self.contained_by.clear();
    }
}

/// Runs the containment test for the newest shape and maintains the relation.
#[derive(Debug, Clone)]
pub struct ContainmentAnalyzer {
    config: SceneConfig,
    relation: ContainmentRelation,
}

impl ContainmentAnalyzer {
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            relation: ContainmentRelation::new(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Compares the last shape of `shapes` against every earlier one and records
    /// each container found. Returns the containers in collection order.
    pub fn analyze_newest(&mut self, shapes: &[Shape]) -> Vec<ShapeId> {
        let Some((newest, earlier)) = shapes.split_last() else {
            return Vec::new();
        };

        let containers: Vec<ShapeId> = earlier
            .iter()
            .filter(|container| containment_test::encloses(&self.config, container, newest))
            .map(Shape::id)
            .collect();

        for container in &containers {
            self.relation.record(*container, newest.id());
        }
        debug!(
            "{} {} checked against {} shapes, inside of {:?}",
            newest.kind(),
            newest.id(),
            earlier.len(),
            containers
        );
        containers
    }

    /// Merges verdicts computed elsewhere (e.g. on worker threads) into the relation.
    pub(crate) fn record_all(&mut self, newest: ShapeId, containers: &[ShapeId]) {
        for container in containers {
            self.relation.record(*container, newest);
        }
    }

    pub fn relation(&self) -> &ContainmentRelation {
        &self.relation
    }

    pub fn contains(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.relation.contains(id)
    }

    pub fn contained_by(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.relation.contained_by(id)
    }

    pub fn clear(&mut self) {
        self.relation.clear();
    }
}

impl Default for ContainmentAnalyzer {
    fn default() -> Self {
        Self {
            config: SceneConfig::default(),
            relation: ContainmentRelation::new(),
        }
    }
}
