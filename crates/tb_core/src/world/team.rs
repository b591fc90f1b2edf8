use serde::{Deserialize, Serialize};

use super::Timestamp;
use crate::geom::{Angle, Point, Vector};

pub type RobotId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub position: Point,
    pub velocity: Vector,
    pub orientation: Angle,
    pub timestamp: Timestamp,
}

impl Robot {
    pub fn new(
        id: RobotId,
        position: Point,
        velocity: Vector,
        orientation: Angle,
        timestamp: Timestamp,
    ) -> Self {
        Self { id, position, velocity, orientation, timestamp }
    }

    /// Time (s) to travel in a straight line to `dest` from rest, with a
    /// trapezoidal velocity profile.
    ///
    /// Continuous in the distance, which keeps pass ratings smooth.
    pub fn time_to_position(&self, dest: Point, max_speed: f64, max_acceleration: f64) -> f64 {
        let dist = self.position.dist(dest);
        if max_speed <= 0.0 || max_acceleration <= 0.0 {
            return f64::INFINITY;
        }
        let accel_dist = max_speed * max_speed / (2.0 * max_acceleration);
        if 2.0 * accel_dist >= dist {
            // Triangular profile, never reaches max speed
            2.0 * (dist / max_acceleration).sqrt()
        } else {
            2.0 * max_speed / max_acceleration + (dist - 2.0 * accel_dist) / max_speed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Team {
    robots: Vec<Robot>,
    goalie_id: Option<RobotId>,
}

impl Team {
    pub fn new(robots: Vec<Robot>) -> Self {
        Self { robots, goalie_id: None }
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn size(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn robot_by_id(&self, id: RobotId) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    /// Replace the robots on this team
    pub fn update_robots(&mut self, robots: Vec<Robot>) {
        self.robots = robots;
    }

    pub fn goalie_id(&self) -> Option<RobotId> {
        self.goalie_id
    }

    pub fn set_goalie_id(&mut self, id: Option<RobotId>) {
        self.goalie_id = id;
    }

    /// Robot closest to the given point
    pub fn nearest_robot(&self, p: Point) -> Option<&Robot> {
        self.robots
            .iter()
            .min_by(|a, b| a.position.dist_sq(p).total_cmp(&b.position.dist_sq(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot_at(id: RobotId, x: f64, y: f64) -> Robot {
        Robot::new(id, Point::new(x, y), Vector::ZERO, Angle::ZERO, Timestamp::default())
    }

    #[test]
    fn test_time_to_position_profiles() {
        let robot = robot_at(0, 0.0, 0.0);
        // 2 m/s, 2 m/s^2: accel distance is 1m, so 1m is a triangular profile
        let short = robot.time_to_position(Point::new(1.0, 0.0), 2.0, 2.0);
        assert!((short - 2.0 * (0.5f64).sqrt()).abs() < 1e-9);
        // 4m: 1s up, 1s down, 2m cruising at 2 m/s
        let long = robot.time_to_position(Point::new(4.0, 0.0), 2.0, 2.0);
        assert!((long - 3.0).abs() < 1e-9);
        // Continuous at the profile switch
        let a = robot.time_to_position(Point::new(2.0 - 1e-9, 0.0), 2.0, 2.0);
        let b = robot.time_to_position(Point::new(2.0 + 1e-9, 0.0), 2.0, 2.0);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_robot() {
        let team = Team::new(vec![robot_at(1, 0.0, 0.0), robot_at(2, 3.0, 0.0)]);
        assert_eq!(team.nearest_robot(Point::new(2.0, 0.0)).map(|r| r.id), Some(2));
        assert!(Team::default().nearest_robot(Point::ORIGIN).is_none());
    }
}
