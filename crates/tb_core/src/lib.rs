//! # tb_core - Pass optimization and tactic execution for robot soccer
//!
//! This library finds good passes continuously in the background while the
//! AI runs its per-tick tactics.
//!
//! ## Features
//! - `PassGenerator`: background gradient search over a pool of candidate
//!   passes, with a lock-per-field interface safe to call from the AI thread
//! - Intents with validated priorities and visitor dispatch
//! - Resumable tactics driven once per tick, with minimum-cost robot
//!   assignment
//! - Serde-configurable tuning constants with presets

// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod action;
pub mod debug_flags;
pub mod error;
pub mod filter;
pub mod geom;
pub mod intent;
pub mod passing;
pub mod tactic;
pub mod util;
pub mod world;

pub use action::MoveAction;
pub use error::{ConfigError, IntentError, PassGeneratorError};
pub use filter::{RobotDetection, RobotFilterConfig, RobotTeamFilter, TeamFilter};
pub use geom::{Angle, Circle, Point, Rectangle, Segment, Vector};
pub use intent::{AvoidArea, Intent, IntentKind, IntentVisitor, Priority};
pub use passing::{
    evaluate_pass, rate_pass, LivenessProbe, Pass, PassGenerator, PassGeneratorConfig,
    PassRating, PassRatingConfig, PassingConfig,
};
pub use tactic::{
    CherryPickTactic, MoveTactic, StopTactic, Tactic, TacticRunner, TacticScheduler, TacticYield,
};
pub use util::GradientDescentOptimizer;
pub use world::{Ball, Field, Robot, RobotId, Team, Timestamp, World};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn target_region() -> Rectangle {
        Rectangle::new(Point::new(4.0, 0.0), Point::new(5.0, 1.0))
    }

    fn empty_world() -> World {
        World::empty(Field::ssl_div_b(), Point::ORIGIN, Timestamp::from_seconds(1.0))
    }

    fn config() -> PassingConfig {
        let mut cfg = PassingConfig::deterministic(2024);
        cfg.generator.max_iteration_duration_ms = 1_000;
        cfg
    }

    fn receiver() -> Robot {
        Robot::new(5, Point::new(2.0, -1.0), Vector::ZERO, Angle::ZERO, Timestamp::from_seconds(1.0))
    }

    #[test]
    fn test_cherry_pick_targets_settle_in_region() {
        let world = empty_world();
        let mut tactic = CherryPickTactic::with_config(&world, target_region(), config()).unwrap();
        assert!(tactic.pass_generator().wait_for_iterations(30, TIMEOUT));

        let mut targets = Vec::new();
        for _ in 0..3 {
            tactic.update_params(&world);
            let TacticYield::Intent(intent) = tactic.resume(&receiver()) else {
                panic!("cherry pick yields every tick");
            };
            let IntentKind::Move { destination, .. } = *intent.kind() else {
                panic!("expected a move intent, got {}", intent.name());
            };
            targets.push(destination);
            assert!(tactic.pass_generator().wait_for_iterations(2, TIMEOUT));
        }

        let distances: Vec<f64> = targets.iter().map(|t| target_region().dist_to_point(*t)).collect();
        for d in &distances {
            assert!(*d < 0.3, "target {d} m from region: {targets:?}");
        }
        for pair in distances.windows(2) {
            assert!(pair[1] <= pair[0] + 0.05, "targets diverging: {targets:?}");
        }
        for pair in targets.windows(2) {
            assert!(pair[0].dist(pair[1]) < 1.0, "targets jumping: {targets:?}");
        }
    }

    #[test]
    fn test_dropping_tactic_stops_generator() {
        let world = empty_world();
        let tactic = CherryPickTactic::with_config(&world, target_region(), config()).unwrap();
        assert!(tactic.pass_generator().wait_for_iterations(1, TIMEOUT));
        let probe = tactic.pass_generator().liveness_probe();
        assert!(probe.is_alive());

        drop(tactic);

        assert!(!probe.is_alive());
    }

    #[test]
    fn test_replacing_scheduled_tactics_stops_generator() {
        let mut world = empty_world();
        world.friendly_team = Team::new(vec![receiver()]);
        let tactic = CherryPickTactic::with_config(&world, target_region(), config()).unwrap();
        let probe = tactic.pass_generator().liveness_probe();

        let mut scheduler = TacticScheduler::new();
        scheduler.add_tactic(Box::new(tactic), true);
        let intents = scheduler.tick(&world);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].robot_id(), 5);
        assert!(probe.is_alive());

        scheduler.set_tactics(Vec::new());

        assert!(!probe.is_alive());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
