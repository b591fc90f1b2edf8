//! Single-threaded tick driver

use tracing::{debug, trace};

use super::{assign_robots, Tactic, TacticRunner};
use crate::debug_flags::tactic_debug_enabled;
use crate::intent::Intent;
use crate::world::World;

/// Runs a fixed, ordered list of tactics once per tick.
///
/// Every tick robots are (re)assigned to tactics by minimum total cost, then
/// each staffed tactic is resumed once, in insertion order. Earlier tactics
/// are staffed first when robots run out.
#[derive(Debug, Default)]
pub struct TacticScheduler {
    runners: Vec<TacticRunner>,
    ticks: u64,
}

impl TacticScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tactic; returns its index
    pub fn add_tactic(&mut self, tactic: Box<dyn Tactic>, loop_forever: bool) -> usize {
        self.runners.push(TacticRunner::new(tactic, loop_forever));
        self.runners.len() - 1
    }

    /// Replace every tactic; the old ones are dropped (and their resources released) here
    pub fn set_tactics(&mut self, tactics: Vec<(Box<dyn Tactic>, bool)>) {
        self.runners = tactics
            .into_iter()
            .map(|(tactic, loop_forever)| TacticRunner::new(tactic, loop_forever))
            .collect();
    }

    pub fn runners(&self) -> &[TacticRunner] {
        &self.runners
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Give each tactic the friendly robot that minimizes total cost
    pub fn assign_robots(&mut self, world: &World) {
        let robots = world.friendly_team.robots();
        let assignment = assign_robots(self.runners.len(), robots.len(), |tactic, robot| {
            self.runners[tactic].calculate_robot_cost(&robots[robot], world)
        });

        for (runner, robot) in self.runners.iter_mut().zip(assignment) {
            runner.update_robot(robot.map(|index| robots[index]));
        }
    }

    /// Assign robots, then resume every tactic once. Returns the intents in
    /// tactic order.
    pub fn tick(&mut self, world: &World) -> Vec<Intent> {
        self.assign_robots(world);

        let mut intents = Vec::with_capacity(self.runners.len());
        for runner in self.runners.iter_mut() {
            runner.update_params(world);
            if let Some(intent) = runner.get_next_intent() {
                if tactic_debug_enabled() {
                    debug!(tactic = runner.name(), "{}", intent);
                }
                intents.push(intent);
            }
        }

        self.ticks += 1;
        trace!(tick = self.ticks, intents = intents.len(), "tactic tick");
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Angle, Point, Vector};
    use crate::intent::IntentKind;
    use crate::tactic::{MoveTactic, StopTactic};
    use crate::world::{Field, Robot, Team, Timestamp};

    fn world_with_robots(positions: &[(f64, f64)]) -> World {
        let mut world = World::empty(Field::ssl_div_b(), Point::ORIGIN, Timestamp::from_seconds(1.0));
        world.friendly_team = Team::new(
            positions
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| {
                    Robot::new(id as u32, Point::new(x, y), Vector::ZERO, Angle::ZERO, Timestamp::from_seconds(1.0))
                })
                .collect(),
        );
        world
    }

    #[test]
    fn test_intents_come_back_in_tactic_order() {
        let mut scheduler = TacticScheduler::new();
        scheduler.add_tactic(Box::new(MoveTactic::new(Point::new(3.0, 0.0), Angle::ZERO, 0.0)), false);
        scheduler.add_tactic(Box::new(StopTactic::new(false)), true);
        let world = world_with_robots(&[(-3.0, 0.0), (2.5, 0.0)]);

        let intents = scheduler.tick(&world);

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].name(), "Move Intent");
        assert_eq!(intents[1].name(), "Stop Intent");
        assert_eq!(scheduler.ticks(), 1);
    }

    #[test]
    fn test_closest_robot_gets_the_move() {
        let mut scheduler = TacticScheduler::new();
        scheduler.add_tactic(Box::new(MoveTactic::new(Point::new(3.0, 0.0), Angle::ZERO, 0.0)), false);
        scheduler.add_tactic(Box::new(MoveTactic::new(Point::new(-3.0, 0.0), Angle::ZERO, 0.0)), false);
        let world = world_with_robots(&[(-2.0, 0.0), (2.0, 0.0)]);

        let intents = scheduler.tick(&world);

        assert_eq!(intents[0].robot_id(), 1);
        assert_eq!(intents[1].robot_id(), 0);
    }

    #[test]
    fn test_unstaffed_tactics_yield_nothing() {
        let mut scheduler = TacticScheduler::new();
        scheduler.add_tactic(Box::new(StopTactic::new(false)), true);
        scheduler.add_tactic(Box::new(StopTactic::new(true)), true);
        let world = world_with_robots(&[(0.0, 0.0)]);

        let intents = scheduler.tick(&world);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].kind(), &IntentKind::Stop { coast: false });
        assert!(scheduler.runners()[1].robot().is_none());
    }

    #[test]
    fn test_finished_tactic_goes_quiet() {
        let mut scheduler = TacticScheduler::new();
        scheduler.add_tactic(Box::new(MoveTactic::new(Point::ORIGIN, Angle::ZERO, 0.0)), false);
        let world = world_with_robots(&[(0.0, 0.0)]);

        assert!(scheduler.tick(&world).is_empty());
        assert!(scheduler.runners()[0].done());
    }
}
