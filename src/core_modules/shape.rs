// THEORY:
// The `shape` module defines the geometric entities that users place on the shared
// plane. A `Shape` is a "dumb" data container: an opaque id, a fill color and a
// closed set of geometries. It knows exactly two things about itself:
//
// 1.  **Area**: a closed-form measure per variant. Area is never derived from pixels.
// 2.  **Silhouette**: how to paint itself onto a `Canvas`. All coordinate math
//     (origin offset, Y flip, clipping) belongs to the canvas, so every render of
//     the same shape lands on exactly the same pixels, no matter which scratch
//     buffer it is drawn into.
//
// The donut is the only non-convex fill. Its inner disk is exposed separately as
// a `Hole` so the containment layer can repaint the hollow center on its own.
// Shapes never learn about each other; nesting lives in the containment module.

use crate::core_modules::canvas::Canvas;
use crate::error::Error;
use image::Rgb;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Opaque, unique identifier of a shape within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in plane coordinates (origin at the canvas center, Y pointing up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Tag identifying the variant of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
    Triangle,
    Donut,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Donut => "Donut",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    /// Case-insensitive; accepts the singular names only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "square" => Ok(ShapeKind::Square),
            "rectangle" => Ok(ShapeKind::Rectangle),
            "triangle" => Ok(ShapeKind::Triangle),
            "donut" => Ok(ShapeKind::Donut),
            _ => Err(Error::UnknownShapeKind(s.to_string())),
        }
    }
}

/// Geometry parameters per variant. Sizes are accepted as given; negative or
/// zero values produce an empty silhouette rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Circle { center: Point, radius: i32 },
    Square { center: Point, side: i32 },
    Rectangle { center: Point, width: i32, height: i32 },
    Triangle { vertices: [Point; 3] },
    /// `inner_radius` is the hole, `outer_radius` the solid ring's edge.
    Donut { center: Point, inner_radius: i32, outer_radius: i32 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Square { .. } => ShapeKind::Square,
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Triangle { .. } => ShapeKind::Triangle,
            Geometry::Donut { .. } => ShapeKind::Donut,
        }
    }

    /// Closed-form area of the variant.
    pub fn area(&self) -> f64 {
        match *self {
            Geometry::Circle { radius, .. } => PI * f64::from(radius) * f64::from(radius),
            Geometry::Square { side, .. } => f64::from(side) * f64::from(side),
            Geometry::Rectangle { width, height, .. } => f64::from(width) * f64::from(height),
            Geometry::Triangle { vertices } => doubled_signed_area(&vertices).abs() as f64 / 2.0,
            Geometry::Donut { inner_radius, outer_radius, .. } => {
                let inner = f64::from(inner_radius);
                let outer = f64::from(outer_radius);
                PI * (outer * outer - inner * inner)
            }
        }
    }

    /// A plane point that stands for the shape when it paints no pixels: the
    /// center, or the vertex centroid rounded toward zero for a triangle.
    pub fn anchor(&self) -> Point {
        match *self {
            Geometry::Circle { center, .. }
            | Geometry::Square { center, .. }
            | Geometry::Rectangle { center, .. }
            | Geometry::Donut { center, .. } => center,
            Geometry::Triangle { vertices } => {
                let sum_x: i64 = vertices.iter().map(|v| i64::from(v.x)).sum();
                let sum_y: i64 = vertices.iter().map(|v| i64::from(v.y)).sum();
                // The mean of three i32 values always fits back into an i32.
                Point::new((sum_x / 3) as i32, (sum_y / 3) as i32)
            }
        }
    }
}

/// Cross product of the triangle's edge vectors. Zero means the vertices are
/// collinear or repeated.
fn doubled_signed_area(v: &[Point; 3]) -> i64 {
    let (ax, ay) = (i64::from(v[0].x), i64::from(v[0].y));
    let (bx, by) = (i64::from(v[1].x), i64::from(v[1].y));
    let (cx, cy) = (i64::from(v[2].x), i64::from(v[2].y));
    (bx - ax) * (cy - ay) - (cx - ax) * (by - ay)
}

/// The inner disk of a donut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub center: Point,
    pub radius: i32,
    /// Fill of the donut the hole belongs to.
    pub fill: Rgb<u8>,
}

impl Hole {
    /// Paints only the inner disk, in the donut's fill unless overridden.
    pub fn render(&self, canvas: &mut Canvas, color: Option<Rgb<u8>>) {
        canvas.fill_disk(self.center, self.radius, color.unwrap_or(self.fill));
    }
}

/// A shape placed on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    geometry: Geometry,
    fill: Rgb<u8>,
}

impl Shape {
    pub fn new(id: ShapeId, geometry: Geometry, fill: Rgb<u8>) -> Self {
        Self { id, geometry, fill }
    }

    pub fn circle(id: ShapeId, x: i32, y: i32, radius: i32, fill: Rgb<u8>) -> Self {
        Self::new(id, Geometry::Circle { center: Point::new(x, y), radius }, fill)
    }

    pub fn square(id: ShapeId, x: i32, y: i32, side: i32, fill: Rgb<u8>) -> Self {
        Self::new(id, Geometry::Square { center: Point::new(x, y), side }, fill)
    }

    pub fn rectangle(id: ShapeId, x: i32, y: i32, width: i32, height: i32, fill: Rgb<u8>) -> Self {
        Self::new(id, Geometry::Rectangle { center: Point::new(x, y), width, height }, fill)
    }

    pub fn triangle(id: ShapeId, a: Point, b: Point, c: Point, fill: Rgb<u8>) -> Self {
        Self::new(id, Geometry::Triangle { vertices: [a, b, c] }, fill)
    }

    pub fn donut(
        id: ShapeId,
        x: i32,
        y: i32,
        inner_radius: i32,
        outer_radius: i32,
        fill: Rgb<u8>,
    ) -> Self {
        Self::new(
            id,
            Geometry::Donut { center: Point::new(x, y), inner_radius, outer_radius },
            fill,
        )
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn fill(&self) -> Rgb<u8> {
        self.fill
    }

    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    /// The donut's inner disk, `None` for every other variant.
    pub fn hole(&self) -> Option<Hole> {
        match self.geometry {
            Geometry::Donut { center, inner_radius, .. } => Some(Hole {
                center,
                radius: inner_radius,
                fill: self.fill,
            }),
            _ => None,
        }
    }

    /// Paints the silhouette in the shape's fill, or in `color` when given.
    /// A donut paints its outer disk and then clears its hole to the canvas background.
    pub fn render(&self, canvas: &mut Canvas, color: Option<Rgb<u8>>) {
        let color = color.unwrap_or(self.fill);
        match self.geometry {
            Geometry::Circle { center, radius } => canvas.fill_disk(center, radius, color),
            Geometry::Square { center, side } => canvas.fill_rect(center, side, side, color),
            Geometry::Rectangle { center, width, height } => {
                canvas.fill_rect(center, width, height, color)
            }
            Geometry::Triangle { vertices } => {
                if doubled_signed_area(&vertices) != 0 {
                    canvas.fill_triangle(vertices, color);
                }
            }
            Geometry::Donut { center, inner_radius, outer_radius } => {
                canvas.fill_disk(center, outer_radius, color);
                let background = canvas.background();
                canvas.fill_disk(center, inner_radius, background);
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry {
            Geometry::Circle { center, radius } => write!(
                f,
                "Circle Id: {} with centre at (x,y): ({},{}) and radius: {}",
                self.id, center.x, center.y, radius
            ),
            Geometry::Square { center, side } => write!(
                f,
                "Square Id: {} at (x,y): ({},{}) and side: {}",
                self.id, center.x, center.y, side
            ),
            Geometry::Rectangle { center, width, height } => write!(
                f,
                "Rectangle Id: {} at (x,y): ({},{}), width: {} and height: {}",
                self.id, center.x, center.y, width, height
            ),
            Geometry::Triangle { vertices: [a, b, c] } => write!(
                f,
                "Triangle Id: {} at (x,y) points: ({},{}), ({},{}), ({},{})",
                self.id, a.x, a.y, b.x, b.y, c.x, c.y
            ),
            Geometry::Donut { center, inner_radius, outer_radius } => write!(
                f,
                "Donut Id: {} with centre at (x,y): ({},{}), radius1: {} & radius2: {}",
                self.id, center.x, center.y, inner_radius, outer_radius
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: Rgb<u8> = Rgb([10, 20, 30]);

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-2
    }

    #[test]
    fn closed_form_areas() {
        assert!(approx(Shape::circle(ShapeId(1), 0, 0, 10, FILL).area(), 314.159));
        assert_eq!(Shape::square(ShapeId(2), 0, 0, 4, FILL).area(), 16.0);
        assert_eq!(Shape::rectangle(ShapeId(3), 0, 0, 3, 5, FILL).area(), 15.0);
        let triangle = Shape::triangle(
            ShapeId(4),
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(0, 3),
            FILL,
        );
        assert_eq!(triangle.area(), 6.0);
        assert!(approx(Shape::donut(ShapeId(5), 0, 0, 10, 20, FILL).area(), 942.478));
    }

    #[test]
    fn triangle_area_ignores_winding() {
        let clockwise = Geometry::Triangle {
            vertices: [Point::new(0, 0), Point::new(0, 3), Point::new(4, 0)],
        };
        assert_eq!(clockwise.area(), 6.0);
    }

    #[test]
    fn only_donuts_have_holes() {
        let donut = Shape::donut(ShapeId(1), 3, 4, 20, 40, FILL);
        let hole = donut.hole().expect("donut exposes its hole");
        assert_eq!(hole.center, Point::new(3, 4));
        assert_eq!(hole.radius, 20);
        assert_eq!(hole.fill, FILL);
        assert!(Shape::circle(ShapeId(2), 0, 0, 5, FILL).hole().is_none());
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Donut".parse::<ShapeKind>().unwrap(), ShapeKind::Donut);
        assert_eq!(" rectangle ".parse::<ShapeKind>().unwrap(), ShapeKind::Rectangle);
        assert!(matches!(
            "hexagon".parse::<ShapeKind>(),
            Err(Error::UnknownShapeKind(name)) if name == "hexagon"
        ));
    }

    #[test]
    fn degenerate_geometry_is_accepted() {
        let shape = Shape::square(ShapeId(9), 0, 0, -4, FILL);
        assert_eq!(shape.kind(), ShapeKind::Square);
        assert_eq!(shape.area(), 16.0);
    }

    #[test]
    fn anchor_is_the_center_or_the_vertex_centroid() {
        let donut = Shape::donut(ShapeId(1), -7, 12, 5, 9, FILL);
        assert_eq!(donut.geometry().anchor(), Point::new(-7, 12));

        let triangle = Geometry::Triangle {
            vertices: [Point::new(0, 0), Point::new(9, 0), Point::new(0, 6)],
        };
        assert_eq!(triangle.anchor(), Point::new(3, 2));

        let far = Geometry::Triangle {
            vertices: [Point::new(i32::MAX, i32::MIN); 3],
        };
        assert_eq!(far.anchor(), Point::new(i32::MAX, i32::MIN));
    }
}
