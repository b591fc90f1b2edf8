use super::{Tactic, TacticYield};
use crate::intent::{Intent, IntentKind, Priority};
use crate::world::{Robot, World};

/// Holds a robot still, forever
#[derive(Debug, Clone, Copy)]
pub struct StopTactic {
    coast: bool,
}

impl StopTactic {
    pub fn new(coast: bool) -> Self {
        Self { coast }
    }
}

impl Tactic for StopTactic {
    fn name(&self) -> &'static str {
        "Stop Tactic"
    }

    fn update_params(&mut self, _world: &World) {}

    /// Any robot can stop
    fn calculate_robot_cost(&self, _robot: &Robot, _world: &World) -> f64 {
        0.0
    }

    fn resume(&mut self, robot: &Robot) -> TacticYield {
        TacticYield::Intent(Intent::with_priority(
            robot.id,
            IntentKind::Stop { coast: self.coast },
            Priority::MEDIUM,
        ))
    }

    fn restart(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Angle, Point, Vector};
    use crate::world::Timestamp;

    #[test]
    fn test_always_stops() {
        let mut tactic = StopTactic::new(true);
        let robot = Robot::new(9, Point::new(1.0, 1.0), Vector::ZERO, Angle::ZERO, Timestamp::default());
        for _ in 0..3 {
            let TacticYield::Intent(intent) = tactic.resume(&robot) else {
                panic!("stop tactic never finishes");
            };
            assert_eq!(intent.kind(), &IntentKind::Stop { coast: true });
            assert_eq!(intent.robot_id(), 9);
        }
    }
}
