//! Path building with canvas-style `arc_to` corners.
//!
//! tiny-skia's [`PathBuilder`] has no tangent-arc primitive, so corners are
//! built here from the current point, a corner point and a target point, the
//! same way an HTML canvas resolves `arcTo`. The arc itself is approximated
//! with one cubic Bézier.

use resvg::tiny_skia::{Path, PathBuilder, Point};

/// A path builder that tracks its current point.
#[derive(Debug, Default)]
pub struct CanvasPath {
    builder: PathBuilder,
    current: Option<Point>,
}

impl CanvasPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.builder.move_to(x, y);
        self.current = Some(Point::from_xy(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        if self.current.is_none() {
            return self.move_to(x, y);
        }
        self.builder.line_to(x, y);
        self.current = Some(Point::from_xy(x, y));
        self
    }

    /// Adds a line toward `(x1, y1)` that turns into a circular arc of
    /// `radius` tangent to both the segment from the current point to
    /// `(x1, y1)` and the segment from `(x1, y1)` to `(x2, y2)`.
    ///
    /// Degenerate input (coincident or collinear points, zero radius) draws a
    /// straight line to `(x1, y1)`.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) -> &mut Self {
        let Some(p0) = self.current else {
            return self.move_to(x1, y1);
        };
        let p1 = Point::from_xy(x1, y1);
        let p2 = Point::from_xy(x2, y2);

        let (Some(u1), Some(u2)) = (unit(p0 - p1), unit(p2 - p1)) else {
            return self.line_to(x1, y1);
        };
        let cos = (u1.x * u2.x + u1.y * u2.y).clamp(-1.0, 1.0);
        let theta = cos.acos();
        if radius <= 0.0 || theta < 1e-6 || (std::f32::consts::PI - theta) < 1e-6 {
            return self.line_to(x1, y1);
        }

        let tangent = radius / (theta / 2.0).tan();
        let t1 = Point::from_xy(p1.x + u1.x * tangent, p1.y + u1.y * tangent);
        let t2 = Point::from_xy(p1.x + u2.x * tangent, p1.y + u2.y * tangent);

        // Control arm length for a circular arc spanning `sweep` radians.
        let sweep = std::f32::consts::PI - theta;
        let arm = 4.0 / 3.0 * (sweep / 4.0).tan() * radius;

        self.line_to(t1.x, t1.y);
        self.builder.cubic_to(
            t1.x - u1.x * arm,
            t1.y - u1.y * arm,
            t2.x - u2.x * arm,
            t2.y - u2.y * arm,
            t2.x,
            t2.y,
        );
        self.current = Some(t2);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.builder.close();
        self
    }

    /// Returns the finished path, or `None` if it is empty.
    pub fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

fn unit(v: Point) -> Option<Point> {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    (len > f32::EPSILON).then(|| Point::from_xy(v.x / len, v.y / len))
}

// ============================================================================
// Shapes
// ============================================================================

/// A `width × width` square with corners rounded by `radius`.
pub fn rounded_square(width: f32, radius: f32) -> Option<Path> {
    let (w, r) = (width, radius);
    let mut path = CanvasPath::new();
    path.move_to(r, 0.0)
        .line_to(w - r, 0.0)
        .arc_to(w, 0.0, w, r, r)
        .line_to(w, w - r)
        .arc_to(w, w, w - r, w, r)
        .line_to(r, w)
        .arc_to(0.0, w, 0.0, w - r, r)
        .line_to(0.0, r)
        .arc_to(0.0, 0.0, w - r, 0.0, r)
        .close();
    path.finish()
}

/// Which inner edge a bevel strip runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// A thin strip hugging the top or bottom inner edge of a rounded square.
///
/// The bottom strip is traced first; the top strip is its vertical mirror.
pub fn bevel_strip(width: f32, radius: f32, height: f32, edge: Edge) -> Option<Path> {
    let (w, r, h) = (width, radius, height);
    let y = |v: f32| match edge {
        Edge::Bottom => v,
        Edge::Top => w - v,
    };

    let mut path = CanvasPath::new();
    path.move_to(r - h, y(w))
        .line_to(w - r, y(w))
        .arc_to(w, y(w), w, y(w - r), r)
        .line_to(w, y(w - (r + h)))
        .arc_to(w, y(w - h), w - r, y(w - h), r)
        .line_to(r, y(w - h))
        .arc_to(0.0, y(w - h), 0.0, y(w - (r + h)), r)
        .line_to(0.0, y(w - h))
        .arc_to(0.0, y(w), r - h, y(w), r)
        .close();
    path.finish()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angle_corner_ends_on_tangent_point() {
        let mut path = CanvasPath::new();
        path.move_to(0.0, 0.0).arc_to(10.0, 0.0, 10.0, 10.0, 4.0);
        let end = path.current.unwrap();
        assert!((end.x - 10.0).abs() < 1e-4);
        assert!((end.y - 4.0).abs() < 1e-4);

        let bounds = path.finish().unwrap().bounds();
        assert!((bounds.right() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn collinear_arc_is_a_line() {
        let mut path = CanvasPath::new();
        path.move_to(0.0, 0.0).arc_to(5.0, 0.0, 10.0, 0.0, 3.0);
        assert_eq!(path.current, Some(Point::from_xy(5.0, 0.0)));
    }

    #[test]
    fn arc_without_current_point_moves() {
        let mut path = CanvasPath::new();
        path.arc_to(3.0, 4.0, 9.0, 9.0, 2.0);
        assert_eq!(path.current, Some(Point::from_xy(3.0, 4.0)));
    }

    #[test]
    fn rounded_square_spans_canvas() {
        let bounds = rounded_square(100.0, 4.7).unwrap().bounds();
        assert!(bounds.left().abs() < 1e-3);
        assert!(bounds.top().abs() < 1e-3);
        assert!((bounds.right() - 100.0).abs() < 1e-3);
        assert!((bounds.bottom() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn strips_hug_their_edge() {
        let bottom = bevel_strip(300.0, 14.1, 4.5, Edge::Bottom).unwrap().bounds();
        assert!((bottom.bottom() - 300.0).abs() < 1e-3);
        assert!(bottom.top() > 270.0);

        let top = bevel_strip(300.0, 14.1, 4.5, Edge::Top).unwrap().bounds();
        assert!(top.top().abs() < 1e-3);
        assert!(top.bottom() < 30.0);
    }
}
