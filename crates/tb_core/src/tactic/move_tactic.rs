use super::{Tactic, TacticYield};
use crate::action::MoveAction;
use crate::geom::{Angle, Point};
use crate::world::{Robot, World};

/// Moves a robot to a destination, then finishes
#[derive(Debug, Clone)]
pub struct MoveTactic {
    destination: Point,
    final_orientation: Angle,
    final_speed: f64,
    move_action: MoveAction,
}

impl MoveTactic {
    pub fn new(destination: Point, final_orientation: Angle, final_speed: f64) -> Self {
        Self {
            destination,
            final_orientation,
            final_speed,
            move_action: MoveAction::new(MoveAction::ROBOT_CLOSE_TO_DEST_THRESHOLD, false),
        }
    }

    /// Retarget; takes effect on the next resume
    pub fn update_control_params(&mut self, destination: Point, final_orientation: Angle, final_speed: f64) {
        self.destination = destination;
        self.final_orientation = final_orientation;
        self.final_speed = final_speed;
    }
}

impl Tactic for MoveTactic {
    fn name(&self) -> &'static str {
        "Move Tactic"
    }

    fn update_params(&mut self, _world: &World) {}

    fn calculate_robot_cost(&self, robot: &Robot, _world: &World) -> f64 {
        robot.position.dist(self.destination)
    }

    fn resume(&mut self, robot: &Robot) -> TacticYield {
        match self.move_action.update_state_and_get_next_intent(
            robot,
            self.destination,
            self.final_orientation,
            self.final_speed,
        ) {
            Some(intent) => TacticYield::Intent(intent),
            None => TacticYield::Done,
        }
    }

    fn restart(&mut self) {
        self.move_action.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vector;
    use crate::intent::IntentKind;
    use crate::world::Timestamp;

    fn robot_at(p: Point) -> Robot {
        Robot::new(1, p, Vector::ZERO, Angle::ZERO, Timestamp::default())
    }

    #[test]
    fn test_moves_then_finishes() {
        let dest = Point::new(2.0, -1.0);
        let mut tactic = MoveTactic::new(dest, Angle::ZERO, 0.0);

        let TacticYield::Intent(intent) = tactic.resume(&robot_at(Point::ORIGIN)) else {
            panic!("far from destination");
        };
        assert!(matches!(intent.kind(), IntentKind::Move { destination, .. } if *destination == dest));

        assert_eq!(tactic.resume(&robot_at(dest)), TacticYield::Done);
    }

    #[test]
    fn test_retarget_after_restart() {
        let mut tactic = MoveTactic::new(Point::ORIGIN, Angle::ZERO, 0.0);
        assert_eq!(tactic.resume(&robot_at(Point::ORIGIN)), TacticYield::Done);

        tactic.update_control_params(Point::new(1.0, 0.0), Angle::ZERO, 0.0);
        tactic.restart();
        assert!(matches!(tactic.resume(&robot_at(Point::ORIGIN)), TacticYield::Intent(_)));
    }

    #[test]
    fn test_cost_is_distance() {
        let tactic = MoveTactic::new(Point::new(3.0, 4.0), Angle::ZERO, 0.0);
        let world = World::empty(Default::default(), Point::ORIGIN, Timestamp::default());
        assert!((tactic.calculate_robot_cost(&robot_at(Point::ORIGIN), &world) - 5.0).abs() < 1e-12);
    }
}
