//! Points, boxes and line segments in PDF user space.

use serde::{Deserialize, Serialize};

/// A point in PDF user space (1 unit = 1/72 inch, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Lower-left corner
    pub min: Point,
    /// Upper-right corner
    pub max: Point,
}

impl BoundingBox {
    /// Create a box from its corners.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Create a box from two arbitrary corners, normalizing the order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether the point lies inside the box (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A straight ruling line drawn on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineSegment {
    /// First endpoint
    pub start: Point,
    /// Second endpoint
    pub end: Point,
}

impl LineSegment {
    /// Create a segment between two points.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }

    /// Whether the segment runs horizontally.
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    /// Whether the segment runs vertically.
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let b = BoundingBox::from_corners(Point::new(10.0, 50.0), Point::new(2.0, 5.0));
        assert_eq!(b.min, Point::new(2.0, 5.0));
        assert_eq!(b.max, Point::new(10.0, 50.0));
        assert_eq!(b.width(), 8.0);
        assert_eq!(b.height(), 45.0);
    }

    #[test]
    fn test_contains_edges() {
        let b = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(b.contains(Point::new(0.0, 10.0)));
        assert!(b.contains(Point::new(5.0, 5.0)));
        assert!(!b.contains(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_wire_names() {
        let b = BoundingBox::new(Point::new(0.0, 0.0), Point::new(612.0, 792.0));
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#"{"Min":{"X":0.0,"Y":0.0},"Max":{"X":612.0,"Y":792.0}}"#);
    }

    #[test]
    fn test_segment_orientation() {
        let h = LineSegment::new(Point::new(0.0, 5.0), Point::new(3.0, 5.0));
        assert!(h.is_horizontal());
        assert!(!h.is_vertical());
        assert_eq!(h.length(), 3.0);
    }
}
