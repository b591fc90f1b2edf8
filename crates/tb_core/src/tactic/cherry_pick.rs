use tracing::debug;

use super::{Tactic, TacticYield};
use crate::action::MoveAction;
use crate::error::PassGeneratorError;
use crate::geom::Rectangle;
use crate::passing::{PassGenerator, PassingConfig};
use crate::world::{Robot, World};

/// Keeps a robot in the best spot to receive a pass inside a target region.
///
/// Owns a [`PassGenerator`] restricted to the region. Every tick the latest
/// world goes to the generator and the robot is sent to the receiver point of
/// the best pass found so far, facing the passer. Never finishes. Dropping
/// the tactic stops the generator's background thread.
#[derive(Debug)]
pub struct CherryPickTactic {
    world: World,
    target_region: Rectangle,
    pass_generator: PassGenerator,
    move_action: MoveAction,
}

impl CherryPickTactic {
    pub fn new(world: &World, target_region: Rectangle) -> Result<Self, PassGeneratorError> {
        Self::with_config(world, target_region, PassingConfig::default())
    }

    /// Passes are assumed to come from the ball's current position
    pub fn with_config(
        world: &World,
        target_region: Rectangle,
        config: PassingConfig,
    ) -> Result<Self, PassGeneratorError> {
        let pass_generator = PassGenerator::with_config(world.clone(), world.ball.position, config)?;
        pass_generator.set_target_region(Some(target_region));
        debug!(?target_region, "cherry pick tactic created");

        Ok(Self {
            world: world.clone(),
            target_region,
            pass_generator,
            move_action: MoveAction::new(MoveAction::ROBOT_CLOSE_TO_DEST_THRESHOLD, true),
        })
    }

    pub fn target_region(&self) -> Rectangle {
        self.target_region
    }

    pub fn pass_generator(&self) -> &PassGenerator {
        &self.pass_generator
    }
}

impl Tactic for CherryPickTactic {
    fn name(&self) -> &'static str {
        "Cherry Pick Tactic"
    }

    fn update_params(&mut self, world: &World) {
        self.world = world.clone();
    }

    /// Robots closer to the target region are preferred
    fn calculate_robot_cost(&self, robot: &Robot, _world: &World) -> f64 {
        self.target_region.dist_to_point(robot.position)
    }

    fn resume(&mut self, robot: &Robot) -> TacticYield {
        self.pass_generator.set_world(self.world.clone());
        self.pass_generator.set_passer_point(self.world.ball.position);

        let (pass, _) = self.pass_generator.get_best_pass_so_far();
        match self.move_action.update_state_and_get_next_intent(
            robot,
            pass.receiver_point(),
            pass.receiver_orientation(),
            0.0,
        ) {
            Some(intent) => TacticYield::Intent(intent),
            None => TacticYield::NoIntent,
        }
    }

    fn restart(&mut self) {
        self.move_action.restart();
    }
}
