//! Intents: what a tactic wants one robot to do for one tick
//!
//! An [`Intent`] carries the robot it is for, a priority in `[0, 100]` used to
//! settle conflicts, the areas the navigator must keep the robot out of, and
//! one of a closed set of [`IntentKind`] variants. Consumers dispatch on the
//! variant through an [`IntentVisitor`].

mod avoid_area;
mod visitor;

pub use avoid_area::AvoidArea;
pub use visitor::IntentVisitor;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IntentError;
use crate::geom::{Angle, Point};
use crate::world::RobotId;

pub const MIN_PRIORITY: u32 = 0;
pub const MAX_PRIORITY: u32 = 100;

/// Intent priority; higher wins conflicts. Always within
/// `[MIN_PRIORITY, MAX_PRIORITY]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Priority(u32);

impl Priority {
    pub const MIN: Priority = Priority(MIN_PRIORITY);
    pub const MEDIUM: Priority = Priority(50);
    pub const MAX: Priority = Priority(MAX_PRIORITY);

    pub fn new(priority: u32) -> Result<Self, IntentError> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(IntentError::InvalidPriority { priority });
        }
        Ok(Self(priority))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::MIN
    }
}

impl TryFrom<u32> for Priority {
    type Error = IntentError;

    fn try_from(priority: u32) -> Result<Self, Self::Error> {
        Priority::new(priority)
    }
}

impl From<Priority> for u32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

/// Variant payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IntentKind {
    /// Drive to `destination`, arriving facing `final_angle` at `final_speed`
    Move { destination: Point, final_angle: Angle, final_speed: f64 },
    /// Kick along the ground from `kick_origin`
    Shoot { kick_origin: Point, kick_direction: Angle, kick_speed: f64 },
    /// Chip over obstacles, landing roughly `chip_distance_meters` away
    Chip { chip_origin: Point, chip_direction: Angle, chip_distance_meters: f64 },
    /// Rotate around `pivot_point` until facing `final_angle`
    Pivot { pivot_point: Point, final_angle: Angle, enable_dribbler: bool },
    /// Stop; `coast` lets the wheels spin down freely instead of braking
    Stop { coast: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    robot_id: RobotId,
    priority: Priority,
    areas_to_avoid: Vec<AvoidArea>,
    kind: IntentKind,
}

impl Intent {
    /// # Errors
    /// [`IntentError::InvalidPriority`] if `priority` is above [`MAX_PRIORITY`]
    pub fn new(robot_id: RobotId, kind: IntentKind, priority: u32) -> Result<Self, IntentError> {
        Ok(Self::with_priority(robot_id, kind, Priority::new(priority)?))
    }

    pub fn with_priority(robot_id: RobotId, kind: IntentKind, priority: Priority) -> Self {
        Self { robot_id, priority, areas_to_avoid: Vec::new(), kind }
    }

    pub fn robot_id(&self) -> RobotId {
        self.robot_id
    }

    pub fn kind(&self) -> &IntentKind {
        &self.kind
    }

    pub fn priority(&self) -> u32 {
        self.priority.value()
    }

    /// Out-of-range values are rejected and leave the intent unchanged
    pub fn set_priority(&mut self, priority: u32) -> Result<(), IntentError> {
        self.priority = Priority::new(priority)?;
        Ok(())
    }

    pub fn areas_to_avoid(&self) -> &[AvoidArea] {
        &self.areas_to_avoid
    }

    pub fn set_areas_to_avoid(&mut self, areas_to_avoid: Vec<AvoidArea>) {
        self.areas_to_avoid = areas_to_avoid;
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            IntentKind::Move { .. } => "Move Intent",
            IntentKind::Shoot { .. } => "Shoot Intent",
            IntentKind::Chip { .. } => "Chip Intent",
            IntentKind::Pivot { .. } => "Pivot Intent",
            IntentKind::Stop { .. } => "Stop Intent",
        }
    }

    /// Calls the visitor method matching this intent's variant
    pub fn accept(&self, visitor: &mut dyn IntentVisitor) {
        match self.kind {
            IntentKind::Move { destination, final_angle, final_speed } => {
                visitor.visit_move(self, destination, final_angle, final_speed)
            }
            IntentKind::Shoot { kick_origin, kick_direction, kick_speed } => {
                visitor.visit_shoot(self, kick_origin, kick_direction, kick_speed)
            }
            IntentKind::Chip { chip_origin, chip_direction, chip_distance_meters } => {
                visitor.visit_chip(self, chip_origin, chip_direction, chip_distance_meters)
            }
            IntentKind::Pivot { pivot_point, final_angle, enable_dribbler } => {
                visitor.visit_pivot(self, pivot_point, final_angle, enable_dribbler)
            }
            IntentKind::Stop { coast } => visitor.visit_stop(self, coast),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} for robot {} (priority {})", self.name(), self.robot_id, self.priority())
    }
}
