use crate::geom::{Angle, Point};
use crate::intent::{AvoidArea, Intent, IntentKind, Priority};
use crate::world::Robot;

/// Moves a robot to a destination.
///
/// Call [`MoveAction::update_state_and_get_next_intent`] every tick with the
/// latest destination. A looping action never finishes and keeps the robot on
/// its destination; otherwise the action is done once the robot is within the
/// close-to-destination threshold.
#[derive(Debug, Clone)]
pub struct MoveAction {
    close_to_dest_threshold: f64,
    loop_forever: bool,
    priority: Priority,
    areas_to_avoid: Vec<AvoidArea>,
    done: bool,
}

impl MoveAction {
    /// Close enough to call a move finished (m)
    pub const ROBOT_CLOSE_TO_DEST_THRESHOLD: f64 = 0.02;

    pub fn new(close_to_dest_threshold: f64, loop_forever: bool) -> Self {
        Self {
            close_to_dest_threshold,
            loop_forever,
            priority: Priority::MEDIUM,
            areas_to_avoid: Vec::new(),
            done: false,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_areas_to_avoid(mut self, areas_to_avoid: Vec<AvoidArea>) -> Self {
        self.areas_to_avoid = areas_to_avoid;
        self
    }

    /// Next Move intent for `robot`, or `None` once a non-looping move is done
    pub fn update_state_and_get_next_intent(
        &mut self,
        robot: &Robot,
        destination: Point,
        final_angle: Angle,
        final_speed: f64,
    ) -> Option<Intent> {
        if self.done {
            return None;
        }
        if !self.loop_forever && robot.position.dist(destination) < self.close_to_dest_threshold {
            self.done = true;
            return None;
        }

        let mut intent = Intent::with_priority(
            robot.id,
            IntentKind::Move { destination, final_angle, final_speed },
            self.priority,
        );
        intent.set_areas_to_avoid(self.areas_to_avoid.clone());
        Some(intent)
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Start over as if newly created
    pub fn restart(&mut self) {
        self.done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vector;
    use crate::world::Timestamp;

    fn robot_at(x: f64, y: f64) -> Robot {
        Robot::new(2, Point::new(x, y), Vector::ZERO, Angle::ZERO, Timestamp::default())
    }

    #[test]
    fn test_yields_move_until_close() {
        let mut action = MoveAction::new(MoveAction::ROBOT_CLOSE_TO_DEST_THRESHOLD, false);
        let dest = Point::new(1.0, 0.0);

        let intent = action
            .update_state_and_get_next_intent(&robot_at(0.0, 0.0), dest, Angle::HALF, 0.0)
            .unwrap();
        assert_eq!(intent.robot_id(), 2);
        assert_eq!(
            intent.kind(),
            &IntentKind::Move { destination: dest, final_angle: Angle::HALF, final_speed: 0.0 }
        );
        assert!(!action.done());

        assert!(action
            .update_state_and_get_next_intent(&robot_at(0.995, 0.0), dest, Angle::HALF, 0.0)
            .is_none());
        assert!(action.done());
    }

    #[test]
    fn test_looping_action_never_finishes() {
        let mut action = MoveAction::new(MoveAction::ROBOT_CLOSE_TO_DEST_THRESHOLD, true);
        let dest = Point::new(1.0, 0.0);
        for _ in 0..3 {
            assert!(action
                .update_state_and_get_next_intent(&robot_at(1.0, 0.0), dest, Angle::ZERO, 0.0)
                .is_some());
        }
        assert!(!action.done());
    }

    #[test]
    fn test_priority_and_avoid_areas_are_applied() {
        let mut action = MoveAction::new(0.1, true)
            .with_priority(Priority::MAX)
            .with_areas_to_avoid(vec![AvoidArea::EnemyRobots]);
        let intent = action
            .update_state_and_get_next_intent(&robot_at(0.0, 0.0), Point::new(2.0, 2.0), Angle::ZERO, 0.0)
            .unwrap();
        assert_eq!(intent.priority(), 100);
        assert_eq!(intent.areas_to_avoid(), &[AvoidArea::EnemyRobots]);
    }

    #[test]
    fn test_restart_clears_done() {
        let mut action = MoveAction::new(0.5, false);
        let here = Point::ORIGIN;
        assert!(action.update_state_and_get_next_intent(&robot_at(0.0, 0.0), here, Angle::ZERO, 0.0).is_none());
        action.restart();
        assert!(!action.done());
    }
}
