// THEORY:
// The `scene` module is the top-level API of the engine. It owns the ordered shape
// collection, assigns ids and fill colors, and runs the containment analyzer every
// time a shape is appended. Callers only deal with geometry in and nesting out:
// `add` returns a report naming the shapes the new one sits inside, and
// `contains` / `contained_by` answer queries for presentation layers.

use crate::core_modules::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, DEFAULT_BACKGROUND};
use crate::core_modules::containment::ContainmentAnalyzer;
use crate::core_modules::palette::{ColorSource, DistinctPalette};
use crate::core_modules::shape::{Geometry, Shape, ShapeId, ShapeKind};
use crate::error::{Error, Result};
use image::Rgb;
use log::{debug, warn};
use std::collections::BTreeSet;

/// Configuration for the scene and its scratch canvases.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Fill of every scratch canvas. Shape colors must differ from it.
    pub background: Rgb<u8>,
    /// When false, appends skip containment analysis entirely.
    pub check_containment: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            background: DEFAULT_BACKGROUND,
            check_containment: true,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// A fresh, background-filled canvas for one comparison.
    pub fn scratch_canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height, self.background)
    }
}

/// What the scene learned about a freshly added shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeReport {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub area: f64,
    /// Earlier shapes found to enclose the new one, in insertion order.
    pub inside_of: Vec<ShapeId>,
}

/// Ordered shape collection with an attached containment analyzer.
pub struct Scene {
    config: SceneConfig,
    analyzer: ContainmentAnalyzer,
    shapes: Vec<Shape>,
    palette: Box<dyn ColorSource>,
    next_id: u32,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self> {
        let palette = Box::new(DistinctPalette::new(config.background));
        Self::with_palette(config, palette)
    }

    pub fn with_palette(config: SceneConfig, palette: Box<dyn ColorSource>) -> Result<Self> {
        let analyzer = ContainmentAnalyzer::new(config.clone())?;
        Ok(Self {
            config,
            analyzer,
            shapes: Vec::new(),
            palette,
            next_id: 1,
        })
    }

    /// Creates a shape with the next free id and a palette color, then appends it.
    pub fn add(&mut self, geometry: Geometry) -> Result<ShapeReport> {
        while self.get(ShapeId(self.next_id)).is_some() {
            self.next_id += 1;
        }
        let id = ShapeId(self.next_id);
        self.next_id += 1;

        let fill = self.palette.next_color();
        let shape = Shape::new(id, geometry, fill);
        let kind = shape.kind();
        let area = shape.area();
        let inside_of = self.push(shape)?;
        Ok(ShapeReport { id, kind, area, inside_of })
    }

    /// Appends an externally built shape and analyzes it against every earlier one.
    /// Returns the ids of the shapes found to contain it.
    pub fn push(&mut self, shape: Shape) -> Result<Vec<ShapeId>> {
        if self.get(shape.id()).is_some() {
            return Err(Error::DuplicateShapeId(shape.id()));
        }
        self.warn_on_color_collision(&shape);

        debug!("adding {}", shape);
        self.shapes.push(shape);
        if !self.config.check_containment {
            return Ok(Vec::new());
        }
        Ok(self.analyzer.analyze_newest(&self.shapes))
    }

    fn warn_on_color_collision(&self, shape: &Shape) {
        if shape.fill() == self.config.background {
            warn!(
                "shape {} uses the background color; containment results will be unreliable",
                shape.id()
            );
        }
        if let Some(other) = self.shapes.iter().find(|other| other.fill() == shape.fill()) {
            warn!(
                "shape {} shares its fill with shape {}; containment results will be unreliable",
                shape.id(),
                other.id()
            );
        }
    }

    /// Removes every shape and forgets all containment edges.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.analyzer.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn total_area(&self) -> f64 {
        self.shapes.iter().map(Shape::area).sum()
    }

    pub fn contains(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.analyzer.contains(id)
    }

    pub fn contained_by(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.analyzer.contained_by(id)
    }

    /// The shapes enclosing `id`, in insertion order.
    pub fn containers_of(&self, id: ShapeId) -> Vec<&Shape> {
        let containers = self.contained_by(id);
        self.shapes
            .iter()
            .filter(|shape| containers.contains(&shape.id()))
            .collect()
    }

    /// Renders every shape in insertion order onto one canvas, for display or export.
    pub fn render(&self) -> Canvas {
        let mut canvas = self.config.scratch_canvas();
        for shape in &self.shapes {
            canvas.draw(shape, None);
        }
        canvas
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}
