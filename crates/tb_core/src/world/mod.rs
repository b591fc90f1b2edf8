//! World snapshot consumed by the pass generator and tactics
//!
//! A [`World`] is a plain value: robots, ball and field geometry at one instant.
//! It is produced upstream by the vision filter (see [`crate::filter`]) and
//! handed around by value; nothing in this crate mutates a snapshot in place
//! while another component reads it.

mod field;
mod team;

pub use field::Field;
pub use team::{Robot, RobotId, Team};

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::geom::{Point, Vector};

/// Monotonic time, in seconds since an arbitrary epoch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl Add<f64> for Timestamp {
    type Output = Timestamp;

    fn add(self, seconds: f64) -> Timestamp {
        Timestamp(self.0 + seconds)
    }
}

impl Sub for Timestamp {
    type Output = f64;

    /// Elapsed seconds between two timestamps
    fn sub(self, rhs: Timestamp) -> f64 {
        self.0 - rhs.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Point,
    pub velocity: Vector,
    pub timestamp: Timestamp,
}

impl Ball {
    pub fn new(position: Point, velocity: Vector, timestamp: Timestamp) -> Self {
        Self { position, velocity, timestamp }
    }
}

/// Everything known about the game at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub field: Field,
    pub friendly_team: Team,
    pub enemy_team: Team,
    pub ball: Ball,
}

impl World {
    pub fn new(field: Field, ball: Ball, friendly_team: Team, enemy_team: Team) -> Self {
        Self { field, friendly_team, enemy_team, ball }
    }

    /// Field with no robots and a stationary ball at `ball_position`
    pub fn empty(field: Field, ball_position: Point, timestamp: Timestamp) -> Self {
        Self::new(
            field,
            Ball::new(ball_position, Vector::ZERO, timestamp),
            Team::default(),
            Team::default(),
        )
    }

    /// Most recent time anything in the world was observed
    pub fn timestamp(&self) -> Timestamp {
        let mut latest = self.ball.timestamp;
        for robot in self.friendly_team.robots().iter().chain(self.enemy_team.robots()) {
            if robot.timestamp > latest {
                latest = robot.timestamp;
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Angle;

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_seconds(1.5);
        assert_eq!((t + 0.5).seconds(), 2.0);
        assert_eq!(Timestamp::from_seconds(3.0) - t, 1.5);
    }

    #[test]
    fn test_world_timestamp_is_latest_observation() {
        let mut world = World::empty(Field::ssl_div_b(), Point::ORIGIN, Timestamp::from_seconds(2.0));
        world.enemy_team.update_robots(vec![Robot::new(
            3,
            Point::new(1.0, 1.0),
            Vector::ZERO,
            Angle::ZERO,
            Timestamp::from_seconds(2.25),
        )]);
        assert_eq!(world.timestamp(), Timestamp::from_seconds(2.25));
    }
}
