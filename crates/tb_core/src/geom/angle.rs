use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Neg, Sub};

/// An angle, stored in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const HALF: Angle = Angle(PI);

    pub const fn from_radians(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees.to_radians())
    }

    pub fn to_radians(self) -> f64 {
        self.0
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn abs(self) -> Angle {
        Angle(self.0.abs())
    }

    /// Equivalent angle in (-pi, pi]
    pub fn clamp(self) -> Angle {
        let mut r = self.0.rem_euclid(2.0 * PI);
        if r > PI {
            r -= 2.0 * PI;
        }
        Angle(r)
    }

    /// Smallest absolute difference between the two angles, in [0, pi]
    pub fn min_diff(self, other: Angle) -> Angle {
        (self - other).clamp().abs()
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_wraps_into_range() {
        let a = Angle::from_degrees(270.0).clamp();
        assert!((a.to_degrees() + 90.0).abs() < 1e-9);
        let b = Angle::from_degrees(-540.0).clamp();
        assert!((b.to_degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_diff_across_wrap() {
        let a = Angle::from_degrees(175.0);
        let b = Angle::from_degrees(-175.0);
        assert!((a.min_diff(b).to_degrees() - 10.0).abs() < 1e-9);
    }
}
