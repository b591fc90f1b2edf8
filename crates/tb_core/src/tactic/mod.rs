//! Tactics: resumable per-robot behaviors
//!
//! A tactic is an explicit state machine. Each tick the scheduler hands it the
//! latest world through [`Tactic::update_params`], then calls
//! [`Tactic::resume`] once; the tactic runs until its single suspension point
//! and yields at most one [`Intent`]. State lives in the tactic's fields, so
//! anything it sets up (a pass generator, a move action) persists across
//! ticks and is released when the tactic is dropped.

mod assignment;
mod cherry_pick;
mod move_tactic;
mod scheduler;
mod stop_tactic;

pub use assignment::assign_robots;
pub use cherry_pick::CherryPickTactic;
pub use move_tactic::MoveTactic;
pub use scheduler::TacticScheduler;
pub use stop_tactic::StopTactic;

use crate::intent::Intent;
use crate::world::{Robot, World};

/// What a tactic produced on one resume
#[derive(Debug, Clone, PartialEq)]
pub enum TacticYield {
    Intent(Intent),
    /// Nothing to do this tick, but not finished
    NoIntent,
    /// The state machine ran to completion
    Done,
}

pub trait Tactic: Send {
    fn name(&self) -> &'static str;

    /// Refresh the tactic's view of the world. Never advances the state machine.
    fn update_params(&mut self, world: &World);

    /// Cost of assigning `robot` to this tactic; lower is better. Pure.
    fn calculate_robot_cost(&self, robot: &Robot, world: &World) -> f64;

    /// Advance to the next suspension point
    fn resume(&mut self, robot: &Robot) -> TacticYield;

    /// Go back to the initial state
    fn restart(&mut self);
}

/// A tactic together with the robot it is driving.
pub struct TacticRunner {
    tactic: Box<dyn Tactic>,
    robot: Option<Robot>,
    loop_forever: bool,
    done: bool,
}

impl TacticRunner {
    /// `loop_forever` restarts the tactic whenever it finishes
    pub fn new(tactic: Box<dyn Tactic>, loop_forever: bool) -> Self {
        Self { tactic, robot: None, loop_forever, done: false }
    }

    pub fn name(&self) -> &'static str {
        self.tactic.name()
    }

    pub fn robot(&self) -> Option<&Robot> {
        self.robot.as_ref()
    }

    pub fn update_robot(&mut self, robot: Option<Robot>) {
        self.robot = robot;
    }

    pub fn update_params(&mut self, world: &World) {
        self.tactic.update_params(world);
    }

    pub fn calculate_robot_cost(&self, robot: &Robot, world: &World) -> f64 {
        self.tactic.calculate_robot_cost(robot, world)
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Resume the tactic once.
    ///
    /// `None` when no robot is assigned, the tactic yielded nothing, or a
    /// non-looping tactic has finished.
    pub fn get_next_intent(&mut self) -> Option<Intent> {
        let robot = self.robot?;
        if self.done {
            return None;
        }

        match self.tactic.resume(&robot) {
            TacticYield::Intent(intent) => Some(intent),
            TacticYield::NoIntent => None,
            TacticYield::Done if self.loop_forever => {
                self.tactic.restart();
                match self.tactic.resume(&robot) {
                    TacticYield::Intent(intent) => Some(intent),
                    _ => None,
                }
            }
            TacticYield::Done => {
                self.done = true;
                None
            }
        }
    }
}

impl std::fmt::Debug for TacticRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TacticRunner")
            .field("tactic", &self.tactic.name())
            .field("robot", &self.robot.map(|r| r.id))
            .field("loop_forever", &self.loop_forever)
            .field("done", &self.done)
            .finish()
    }
}
