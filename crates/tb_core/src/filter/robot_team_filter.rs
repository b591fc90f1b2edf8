use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{RobotDetection, TeamFilter};
use crate::geom::{Point, Vector};
use crate::world::{Robot, RobotId, Team, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotFilterConfig {
    /// Detections below this confidence are ignored (default: 0.1)
    pub min_confidence: f64,
    /// Robots unseen for this long are dropped from the team (default: 1.0s)
    pub expiry_seconds: f64,
}

impl Default for RobotFilterConfig {
    fn default() -> Self {
        Self { min_confidence: 0.1, expiry_seconds: 1.0 }
    }
}

/// State for a single robot
#[derive(Debug, Clone)]
struct RobotFilter {
    robot: Robot,
}

impl RobotFilter {
    /// Blend this frame's detections of the robot, weighted by confidence
    fn update(&mut self, detections: &[&RobotDetection]) {
        let total_confidence: f64 = detections.iter().map(|d| d.confidence).sum();
        if total_confidence <= 0.0 {
            return;
        }

        let mut position = Vector::ZERO;
        let mut heading = Vector::ZERO;
        let mut timestamp = self.robot.timestamp;
        for detection in detections {
            let weight = detection.confidence / total_confidence;
            position = position + detection.position.to_vector() * weight;
            heading = heading + Vector::from_angle(detection.orientation) * weight;
            if detection.timestamp > timestamp {
                timestamp = detection.timestamp;
            }
        }
        let position = Point::ORIGIN + position;

        let dt = timestamp - self.robot.timestamp;
        let velocity = if dt > 0.0 {
            (position - self.robot.position) * (1.0 / dt)
        } else {
            self.robot.velocity
        };
        let orientation =
            if heading.length() > 0.0 { heading.orientation() } else { self.robot.orientation };

        self.robot = Robot::new(self.robot.id, position, velocity, orientation, timestamp);
    }
}

/// Keeps one [`RobotFilter`] per robot id on a team
#[derive(Debug, Clone, Default)]
pub struct RobotTeamFilter {
    config: RobotFilterConfig,
    robot_filters: BTreeMap<RobotId, RobotFilter>,
}

impl RobotTeamFilter {
    pub fn new(config: RobotFilterConfig) -> Self {
        Self { config, robot_filters: BTreeMap::new() }
    }

    pub fn num_tracked_robots(&self) -> usize {
        self.robot_filters.len()
    }
}

impl TeamFilter for RobotTeamFilter {
    fn filter(&mut self, current_team: &Team, detections: &[RobotDetection]) -> Team {
        for robot in current_team.robots() {
            self.robot_filters.entry(robot.id).or_insert(RobotFilter { robot: *robot });
        }

        let mut by_id: BTreeMap<RobotId, Vec<&RobotDetection>> = BTreeMap::new();
        for detection in detections {
            if detection.confidence >= self.config.min_confidence && detection.position.is_finite() {
                by_id.entry(detection.id).or_default().push(detection);
            }
        }

        for (id, robot_detections) in &by_id {
            match self.robot_filters.get_mut(id) {
                Some(filter) => filter.update(robot_detections),
                None => {
                    let first = robot_detections[0];
                    let mut filter = RobotFilter {
                        robot: Robot::new(
                            *id,
                            first.position,
                            Vector::ZERO,
                            first.orientation,
                            first.timestamp,
                        ),
                    };
                    filter.update(robot_detections);
                    // A new robot has no motion history yet
                    filter.robot.velocity = Vector::ZERO;
                    debug!(robot_id = id, "new robot detected");
                    self.robot_filters.insert(*id, filter);
                }
            }
        }

        let latest = self
            .robot_filters
            .values()
            .map(|f| f.robot.timestamp)
            .fold(Timestamp::default(), |a, b| if b > a { b } else { a });
        let expiry = self.config.expiry_seconds;
        self.robot_filters.retain(|id, filter| {
            let keep = latest - filter.robot.timestamp <= expiry;
            if !keep {
                debug!(robot_id = id, "robot expired");
            }
            keep
        });

        let mut team = Team::new(self.robot_filters.values().map(|f| f.robot).collect());
        team.set_goalie_id(current_team.goalie_id());
        team
    }
}
