use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    neg_x_neg_y: Point,
    pos_x_pos_y: Point,
}

impl Rectangle {
    /// Rectangle spanning two opposite corners, given in any order
    pub fn new(corner1: Point, corner2: Point) -> Self {
        Self {
            neg_x_neg_y: Point::new(corner1.x.min(corner2.x), corner1.y.min(corner2.y)),
            pos_x_pos_y: Point::new(corner1.x.max(corner2.x), corner1.y.max(corner2.y)),
        }
    }

    pub fn x_min(&self) -> f64 {
        self.neg_x_neg_y.x
    }

    pub fn x_max(&self) -> f64 {
        self.pos_x_pos_y.x
    }

    pub fn y_min(&self) -> f64 {
        self.neg_x_neg_y.y
    }

    pub fn y_max(&self) -> f64 {
        self.pos_x_pos_y.y
    }

    pub fn x_length(&self) -> f64 {
        self.x_max() - self.x_min()
    }

    pub fn y_length(&self) -> f64 {
        self.y_max() - self.y_min()
    }

    pub fn centre(&self) -> Point {
        Point::new(
            (self.x_min() + self.x_max()) / 2.0,
            (self.y_min() + self.y_max()) / 2.0,
        )
    }

    pub fn area(&self) -> f64 {
        self.x_length() * self.y_length()
    }

    /// Whether the point lies inside or on the boundary
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min() && p.x <= self.x_max() && p.y >= self.y_min() && p.y <= self.y_max()
    }

    /// Distance from the point to the rectangle, zero inside
    pub fn dist_to_point(&self, p: Point) -> f64 {
        let dx = (self.x_min() - p.x).max(0.0).max(p.x - self.x_max());
        let dy = (self.y_min() - p.y).max(0.0).max(p.y - self.y_max());
        dx.hypot(dy)
    }

    /// Grow (positive) or shrink (negative) each side by `amount`.
    /// Shrinking past the centre collapses to the centre.
    pub fn expand(&self, amount: f64) -> Rectangle {
        let c = self.centre();
        let half_x = (self.x_length() / 2.0 + amount).max(0.0);
        let half_y = (self.y_length() / 2.0 + amount).max(0.0);
        Rectangle::new(
            Point::new(c.x - half_x, c.y - half_y),
            Point::new(c.x + half_x, c.y + half_y),
        )
    }

    /// Overlapping region of two rectangles, if any
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let x_min = self.x_min().max(other.x_min());
        let x_max = self.x_max().min(other.x_max());
        let y_min = self.y_min().max(other.y_min());
        let y_max = self.y_max().min(other.y_max());
        if x_min > x_max || y_min > y_max {
            return None;
        }
        Some(Rectangle::new(Point::new(x_min, y_min), Point::new(x_max, y_max)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub origin: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(origin: Point, radius: f64) -> Self {
        Self { origin, radius: radius.max(0.0) }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.origin.dist(p) <= self.radius
    }
}

/// Line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.dist(self.end)
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Point) -> Point {
        let dir = self.end - self.start;
        let len_sq = dir.length_sq();
        if len_sq < 1e-12 {
            return self.start;
        }
        let t = ((p - self.start).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.start + dir * t
    }

    pub fn dist_to_point(&self, p: Point) -> f64 {
        self.closest_point(p).dist(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_normalizes_corners() {
        let r = Rectangle::new(Point::new(5.0, 1.0), Point::new(4.0, 0.0));
        assert_eq!(r.x_min(), 4.0);
        assert_eq!(r.y_max(), 1.0);
        assert_eq!(r.centre(), Point::new(4.5, 0.5));
    }

    #[test]
    fn test_rectangle_distance() {
        let r = Rectangle::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert_eq!(r.dist_to_point(Point::new(0.5, 0.5)), 0.0);
        assert!((r.dist_to_point(Point::new(2.0, 0.5)) - 1.0).abs() < 1e-12);
        assert!((r.dist_to_point(Point::new(4.0, 5.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rectangle_intersection() {
        let field = Rectangle::new(Point::new(-4.5, -3.0), Point::new(4.5, 3.0));
        let region = Rectangle::new(Point::new(4.0, 0.0), Point::new(5.0, 1.0));
        let overlap = field.intersection(&region).unwrap();
        assert_eq!(overlap.x_max(), 4.5);
        assert!(field
            .intersection(&Rectangle::new(Point::new(6.0, 0.0), Point::new(7.0, 1.0)))
            .is_none());
    }

    #[test]
    fn test_segment_closest_point_clamps_to_ends() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert_eq!(s.closest_point(Point::new(1.0, 3.0)), Point::new(1.0, 0.0));
        assert_eq!(s.closest_point(Point::new(-1.0, 1.0)), Point::new(0.0, 0.0));
        assert_eq!(s.closest_point(Point::new(9.0, 1.0)), Point::new(2.0, 0.0));
    }
}
