//! Points and vectors on the field plane (meters)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::Angle;

/// A location on the field, in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn dist(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    #[inline]
    pub fn dist_sq(&self, other: Point) -> f64 {
        (*self - other).length_sq()
    }

    /// Vector from the origin to this point
    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A displacement on the field plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along the given angle
    pub fn from_angle(angle: Angle) -> Self {
        Self::new(angle.to_radians().cos(), angle.to_radians().sin())
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction; zero for (near) zero vectors
    pub fn normalize(&self) -> Vector {
        let len = self.length();
        if len < 1e-9 {
            Vector::ZERO
        } else {
            Vector::new(self.x / len, self.y / len)
        }
    }

    /// Vector of the given length in the same direction
    pub fn with_length(&self, length: f64) -> Vector {
        self.normalize() * length
    }

    #[inline]
    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product
    #[inline]
    pub fn cross(&self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn orientation(&self) -> Angle {
        Angle::from_radians(self.y.atan2(self.x))
    }

    /// Unsigned angle between two vectors, in [0, pi]
    pub fn angle_between(&self, other: Vector) -> Angle {
        Angle::from_radians(self.cross(other).abs().atan2(self.dot(other)))
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.dist(b) - 5.0).abs() < 1e-12);
        assert!((a.dist_sq(b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector::ZERO.normalize(), Vector::ZERO);
        let v = Vector::new(0.0, 2.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_is_unsigned() {
        let a = Vector::new(1.0, 0.0);
        let b = Vector::new(0.0, -1.0);
        let angle = a.angle_between(b);
        assert!((angle.to_degrees() - 90.0).abs() < 1e-9);
    }
}
