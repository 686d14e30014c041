// THEORY:
// The `Canvas` is a fixed-size offscreen RGB buffer with a known background
// color. It is the scratch space on which shapes are rasterized for comparison.
//
// Key architectural principles:
// 1.  **Single Transform**: every primitive goes through `to_canvas`, which places
//     the plane origin at the buffer center and flips Y. Shapes never compute
//     pixel coordinates themselves, so two renders of the same shape are always
//     pixel-identical. The transform works in `i64`, so any `i32` plane point
//     maps without overflow.
// 2.  **Clip First**: every primitive computes its pixel bounding box and returns
//     at once when the box misses the buffer. Shapes that stay near the buffer
//     (within one buffer size of each edge) are handed to `imageproc`; anything
//     larger or farther out is filled row by row over the visible rows only, so
//     drawing cost never grows with the unclipped size of the geometry.
// 3.  **Silent Clipping**: out-of-range pixel reads/writes are ignored. No
//     primitive fails.
// 4.  **Disposable**: a canvas holds no history. The containment layer creates a
//     fresh one per comparison and drops it afterwards.

use crate::core_modules::shape::{Hole, Point, Shape};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::rect::Rect;

pub const CANVAS_WIDTH: u32 = 1024;
pub const CANVAS_HEIGHT: u32 = 768;
/// Orange, the canvas fill shape colors are kept distinct from.
pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([255, 165, 0]);

/// Inclusive pixel-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

/// A background-filled pixel buffer addressed by integer (x, y).
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    background: Rgb<u8>,
}

impl Canvas {
    /// Creates a canvas already filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Clears the full buffer to a flat color.
    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Clears the full buffer to the background color.
    pub fn clear(&mut self) {
        self.fill(self.background);
    }

    /// Delegates to the shape's own render.
    pub fn draw(&mut self, shape: &Shape, color: Option<Rgb<u8>>) {
        shape.render(self, color);
    }

    /// Paints only a donut's inner disk.
    pub fn draw_hole(&mut self, hole: &Hole, color: Option<Rgb<u8>>) {
        hole.render(self, color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        let (x, y) = self.checked(i64::from(x), i64::from(y))?;
        Some(*self.image.get_pixel(x, y))
    }

    /// Color under a plane point, `None` when it falls outside the buffer.
    pub fn pixel_at(&self, point: Point) -> Option<Rgb<u8>> {
        let (x, y) = self.to_canvas(point);
        let (x, y) = self.checked(x, y)?;
        Some(*self.image.get_pixel(x, y))
    }

    /// Writes a pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if let Some((x, y)) = self.checked(i64::from(x), i64::from(y)) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Maps a plane point to buffer coordinates: `(x + w/2, -y + h/2)`.
    pub fn to_canvas(&self, point: Point) -> (i64, i64) {
        let origin_x = i64::from(self.width() / 2);
        let origin_y = i64::from(self.height() / 2);
        (i64::from(point.x) + origin_x, origin_y - i64::from(point.y))
    }

    /// Filled disk centered on a plane point. Non-positive radii paint nothing.
    pub fn fill_disk(&mut self, center: Point, radius: i32, color: Rgb<u8>) {
        if radius <= 0 {
            return;
        }
        let (cx, cy) = self.to_canvas(center);
        let r = i64::from(radius);
        let bounds = Bounds {
            left: cx - r,
            top: cy - r,
            right: cx + r,
            bottom: cy + r,
        };
        let Some(visible) = self.clip(bounds) else {
            return;
        };

        if self.is_near(bounds) {
            if let (Ok(x), Ok(y)) = (i32::try_from(cx), i32::try_from(cy)) {
                draw_filled_circle_mut(&mut self.image, (x, y), radius, color);
                return;
            }
        }

        let r_squared = (r * r) as f64;
        for y in visible.top..=visible.bottom {
            let dy = (y - cy) as f64;
            let reach = r_squared - dy * dy;
            if reach < 0.0 {
                continue;
            }
            let half = reach.sqrt().floor() as i64;
            self.fill_row(y, cx - half, cx + half, color);
        }
    }

    /// Filled axis-aligned rectangle centered on a plane point.
    pub fn fill_rect(&mut self, center: Point, width: i32, height: i32, color: Rgb<u8>) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (cx, cy) = self.to_canvas(center);
        let (width, height) = (i64::from(width), i64::from(height));
        let left = cx - width / 2;
        let top = cy - height / 2;
        let Some(visible) = self.clip(Bounds {
            left,
            top,
            right: left + width - 1,
            bottom: top + height - 1,
        }) else {
            return;
        };

        // Clipped coordinates lie inside the buffer, which is far smaller than i32::MAX.
        let rect = Rect::at(visible.left as i32, visible.top as i32).of_size(
            (visible.right - visible.left + 1) as u32,
            (visible.bottom - visible.top + 1) as u32,
        );
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    /// Filled triangle. The caller guarantees the vertices are not collinear.
    pub fn fill_triangle(&mut self, vertices: [Point; 3], color: Rgb<u8>) {
        let corners = vertices.map(|vertex| self.to_canvas(vertex));
        let bounds = Bounds {
            left: corners.iter().map(|c| c.0).min().unwrap_or_default(),
            top: corners.iter().map(|c| c.1).min().unwrap_or_default(),
            right: corners.iter().map(|c| c.0).max().unwrap_or_default(),
            bottom: corners.iter().map(|c| c.1).max().unwrap_or_default(),
        };
        let Some(visible) = self.clip(bounds) else {
            return;
        };

        if self.is_near(bounds) {
            let polygon: Option<Vec<_>> = corners
                .iter()
                .map(|&(x, y)| {
                    Some(imageproc::point::Point::new(
                        i32::try_from(x).ok()?,
                        i32::try_from(y).ok()?,
                    ))
                })
                .collect();
            if let Some(polygon) = polygon {
                draw_polygon_mut(&mut self.image, &polygon, color);
                return;
            }
        }

        for y in visible.top..=visible.bottom {
            if let Some((from, to)) = row_span(&corners, y) {
                self.fill_row(y, from, to, color);
            }
        }
    }

    /// Paints `from..=to` on row `y`, clipped to the buffer.
    fn fill_row(&mut self, y: i64, from: i64, to: i64, color: Rgb<u8>) {
        let Some((_, row)) = self.checked(0, y) else {
            return;
        };
        let from = from.max(0);
        let to = to.min(i64::from(self.width()) - 1);
        for x in from..=to {
            self.image.put_pixel(x as u32, row, color);
        }
    }

    /// The part of `bounds` that lies on the buffer, `None` when nothing does.
    fn clip(&self, bounds: Bounds) -> Option<Bounds> {
        let visible = Bounds {
            left: bounds.left.max(0),
            top: bounds.top.max(0),
            right: bounds.right.min(i64::from(self.width()) - 1),
            bottom: bounds.bottom.min(i64::from(self.height()) - 1),
        };
        (visible.left <= visible.right && visible.top <= visible.bottom).then_some(visible)
    }

    /// True when `bounds` stays within one buffer size of every edge.
    fn is_near(&self, bounds: Bounds) -> bool {
        let width = i64::from(self.width());
        let height = i64::from(self.height());
        bounds.left >= -width
            && bounds.top >= -height
            && bounds.right < 2 * width
            && bounds.bottom < 2 * height
    }

    fn checked(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some((x, y))
    }
}

/// Leftmost and rightmost pixel of a triangle's scanline at row `y`,
/// rounded to the nearest pixel.
fn row_span(corners: &[(i64, i64); 3], y: i64) -> Option<(i64, i64)> {
    let y = y as f64;
    let mut span: Option<(f64, f64)> = None;
    let mut widen = |x: f64| {
        span = Some(match span {
            Some((min, max)) => (min.min(x), max.max(x)),
            None => (x, x),
        });
    };

    for i in 0..3 {
        let (ax, ay) = (corners[i].0 as f64, corners[i].1 as f64);
        let (bx, by) = (corners[(i + 1) % 3].0 as f64, corners[(i + 1) % 3].1 as f64);
        if ay == by {
            if ay == y {
                widen(ax);
                widen(bx);
            }
        } else if (ay.min(by)..=ay.max(by)).contains(&y) {
            widen(ax + (y - ay) * (bx - ax) / (by - ay));
        }
    }

    span.map(|(min, max)| (min.round() as i64, max.round() as i64))
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, DEFAULT_BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::shape::ShapeId;

    const RED: Rgb<u8> = Rgb([200, 0, 0]);

    #[test]
    fn transform_places_origin_at_center_with_y_flipped() {
        let canvas = Canvas::default();
        assert_eq!(canvas.to_canvas(Point::new(0, 0)), (512, 384));
        assert_eq!(canvas.to_canvas(Point::new(10, 20)), (522, 364));
        assert_eq!(canvas.to_canvas(Point::new(-512, -384)), (0, 768));
    }

    #[test]
    fn new_canvas_is_background_filled() {
        let canvas = Canvas::new(8, 4, RED);
        assert!(canvas.image().pixels().all(|p| *p == RED));
        assert_eq!(canvas.background(), RED);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut canvas = Canvas::new(4, 4, DEFAULT_BACKGROUND);
        canvas.set_pixel(-1, 0, RED);
        canvas.set_pixel(4, 0, RED);
        canvas.set_pixel(0, 4, RED);
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));
        assert_eq!(canvas.get_pixel(10, 10), None);

        canvas.set_pixel(3, 3, RED);
        assert_eq!(canvas.get_pixel(3, 3), Some(RED));
    }

    #[test]
    fn fill_and_clear() {
        let mut canvas = Canvas::new(16, 16, DEFAULT_BACKGROUND);
        canvas.fill(RED);
        assert!(canvas.image().pixels().all(|p| *p == RED));
        canvas.clear();
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));
    }

    #[test]
    fn square_is_centered_on_its_point() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::square(ShapeId(1), 0, 0, 10, RED), None);
        assert_eq!(canvas.get_pixel(507, 379), Some(RED));
        assert_eq!(canvas.get_pixel(516, 388), Some(RED));
        assert_eq!(canvas.get_pixel(506, 384), Some(DEFAULT_BACKGROUND));
        assert_eq!(canvas.get_pixel(517, 384), Some(DEFAULT_BACKGROUND));
    }

    #[test]
    fn positive_y_is_drawn_above_the_origin() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::circle(ShapeId(1), 0, 100, 3, RED), None);
        assert_eq!(canvas.get_pixel(512, 284), Some(RED));
        assert_eq!(canvas.get_pixel(512, 484), Some(DEFAULT_BACKGROUND));
    }

    #[test]
    fn off_canvas_shapes_are_clipped() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::circle(ShapeId(1), 5000, 5000, 50, RED), None);
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));

        // Straddles the left edge: only the visible half lands.
        canvas.draw(&Shape::square(ShapeId(2), -512, 0, 20, RED), None);
        assert_eq!(canvas.get_pixel(0, 384), Some(RED));
    }

    #[test]
    fn degenerate_shapes_paint_nothing() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::circle(ShapeId(1), 0, 0, 0, RED), None);
        canvas.draw(&Shape::rectangle(ShapeId(2), 0, 0, -5, 10, RED), None);
        let collinear = Shape::triangle(
            ShapeId(3),
            Point::new(0, 0),
            Point::new(5, 5),
            Point::new(10, 10),
            RED,
        );
        canvas.draw(&collinear, None);
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));
    }

    #[test]
    fn donut_leaves_its_hole_in_background() {
        let mut canvas = Canvas::default();
        let donut = Shape::donut(ShapeId(1), 0, 0, 20, 40, RED);
        canvas.draw(&donut, None);
        assert_eq!(canvas.get_pixel(512, 384), Some(DEFAULT_BACKGROUND));
        assert_eq!(canvas.get_pixel(542, 384), Some(RED));
        assert_eq!(canvas.get_pixel(562, 384), Some(DEFAULT_BACKGROUND));

        let hole = donut.hole().expect("donut hole");
        canvas.draw_hole(&hole, None);
        assert_eq!(canvas.get_pixel(512, 384), Some(RED));
    }

    #[test]
    fn color_override_replaces_fill() {
        let mut canvas = Canvas::default();
        let blue = Rgb([0, 0, 200]);
        canvas.draw(&Shape::circle(ShapeId(1), 0, 0, 5, RED), Some(blue));
        assert_eq!(canvas.get_pixel(512, 384), Some(blue));
    }

    #[test]
    fn pixel_at_reads_through_the_transform() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::square(ShapeId(1), 100, 100, 4, RED), None);
        assert_eq!(canvas.pixel_at(Point::new(100, 100)), Some(RED));
        assert_eq!(canvas.pixel_at(Point::new(0, 0)), Some(DEFAULT_BACKGROUND));
        assert_eq!(canvas.pixel_at(Point::new(i32::MAX, i32::MIN)), None);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let mut canvas = Canvas::default();
        assert_eq!(
            canvas.to_canvas(Point::new(i32::MAX, i32::MIN)),
            (i64::from(i32::MAX) + 512, 384 - i64::from(i32::MIN))
        );

        canvas.draw(&Shape::circle(ShapeId(1), i32::MAX, i32::MIN, 5, RED), None);
        canvas.draw(&Shape::circle(ShapeId(2), i32::MIN, i32::MAX, i32::MAX, RED), None);
        canvas.draw(&Shape::square(ShapeId(3), i32::MAX - 10, 0, 10, RED), None);
        canvas.draw(&Shape::rectangle(ShapeId(4), i32::MIN, i32::MIN, 40, 40, RED), None);
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));

        canvas.draw(&Shape::square(ShapeId(5), 0, 0, i32::MAX, RED), None);
        assert!(canvas.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn huge_circle_covers_the_whole_canvas() {
        let mut canvas = Canvas::default();
        canvas.draw(&Shape::circle(ShapeId(1), 0, 0, 50_000_000, RED), None);
        assert!(canvas.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn far_flung_triangle_is_filled_row_by_row() {
        let mut canvas = Canvas::default();
        let covering = Shape::triangle(
            ShapeId(1),
            Point::new(-2_000_000_000, -2_000_000_000),
            Point::new(2_000_000_000, -2_000_000_000),
            Point::new(0, 2_000_000_000),
            RED,
        );
        canvas.draw(&covering, None);
        assert!(canvas.image().pixels().all(|p| *p == RED));

        canvas.clear();
        let beside = Shape::triangle(
            ShapeId(2),
            Point::new(2_000_000_000, 0),
            Point::new(2_000_000_100, 0),
            Point::new(2_000_000_000, 100),
            RED,
        );
        canvas.draw(&beside, None);
        assert!(canvas.image().pixels().all(|p| *p == DEFAULT_BACKGROUND));
    }

    #[test]
    fn large_triangle_clipped_to_its_visible_half() {
        // Spans far past the left edge, so it takes the row-by-row path.
        let mut canvas = Canvas::default();
        let wedge = Shape::triangle(
            ShapeId(1),
            Point::new(-100_000, -100_000),
            Point::new(0, -100_000),
            Point::new(0, 100_000),
            RED,
        );
        canvas.draw(&wedge, None);
        assert_eq!(canvas.get_pixel(0, 384), Some(RED));
        assert_eq!(canvas.get_pixel(500, 384), Some(RED));
        assert_eq!(canvas.get_pixel(530, 384), Some(DEFAULT_BACKGROUND));
        assert_eq!(canvas.get_pixel(1023, 0), Some(DEFAULT_BACKGROUND));
    }
}
