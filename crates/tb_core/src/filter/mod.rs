//! Turning raw robot detections into a team state
//!
//! Only the boundary lives here: a [`TeamFilter`] takes the current team and a
//! batch of detections and returns the updated team. [`RobotTeamFilter`] is a
//! simple implementation keeping one filter per robot id.

mod robot_team_filter;

pub use robot_team_filter::{RobotFilterConfig, RobotTeamFilter};

use serde::{Deserialize, Serialize};

use crate::geom::{Angle, Point};
use crate::world::{RobotId, Team, Timestamp};

/// One robot as seen by one camera in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotDetection {
    pub id: RobotId,
    pub position: Point,
    pub orientation: Angle,
    /// In [0, 1]
    pub confidence: f64,
    pub timestamp: Timestamp,
}

pub trait TeamFilter {
    fn filter(&mut self, current_team: &Team, detections: &[RobotDetection]) -> Team;
}
