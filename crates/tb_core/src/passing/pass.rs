use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geom::{Angle, Point};
use crate::world::Timestamp;

/// A candidate pass: kicked from `passer_point` at `start_time` with speed
/// `speed_m_per_s`, received at `receiver_point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    passer_point: Point,
    receiver_point: Point,
    speed_m_per_s: f64,
    start_time: Timestamp,
}

impl Pass {
    /// Negative speeds are clamped to zero.
    pub fn new(
        passer_point: Point,
        receiver_point: Point,
        speed_m_per_s: f64,
        start_time: Timestamp,
    ) -> Self {
        Self {
            passer_point,
            receiver_point,
            speed_m_per_s: speed_m_per_s.max(0.0),
            start_time,
        }
    }

    pub fn passer_point(&self) -> Point {
        self.passer_point
    }

    pub fn receiver_point(&self) -> Point {
        self.receiver_point
    }

    pub fn speed(&self) -> f64 {
        self.speed_m_per_s
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Copy of this pass kicked from a different point
    pub fn with_passer_point(&self, passer_point: Point) -> Pass {
        Pass { passer_point, ..*self }
    }

    pub fn length(&self) -> f64 {
        self.passer_point.dist(self.receiver_point)
    }

    /// Direction the receiver should face: towards the passer
    pub fn receiver_orientation(&self) -> Angle {
        (self.passer_point - self.receiver_point).orientation()
    }

    /// Direction the passer should face: towards the receiver
    pub fn passer_orientation(&self) -> Angle {
        (self.receiver_point - self.passer_point).orientation()
    }

    /// Seconds the ball is in flight, assuming constant speed
    pub fn estimate_pass_duration(&self) -> f64 {
        if self.speed_m_per_s <= 0.0 {
            return f64::INFINITY;
        }
        self.length() / self.speed_m_per_s
    }

    pub fn estimate_receive_time(&self) -> Timestamp {
        self.start_time + self.estimate_pass_duration()
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Pass from ({:.2}, {:.2}) to ({:.2}, {:.2}) w/ speed {:.2} m/s at t={:.3}s",
            self.passer_point.x,
            self.passer_point.y,
            self.receiver_point.x,
            self.receiver_point.y,
            self.speed_m_per_s,
            self.start_time.seconds()
        )
    }
}
