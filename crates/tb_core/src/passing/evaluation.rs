//! Pass quality function
//!
//! A pass is rated as the product of independent factors, each in [0, 1]:
//! - static position: receiver on the field, away from our own goal
//! - friendly capability: a friendly robot can reach the receiver point in time
//! - enemy risk: interception along the ball path, crowding at the receiver
//! - shoot: open view of the enemy goal after receiving
//! - target region: receiver inside the requested region (if any)
//! - speed / time: pass speed and start time within feasible bands
//!
//! Every factor is built from sigmoids rather than hard cutoffs. Local search in
//! the pass generator relies on the rating being continuous; a step function
//! here leaves the optimizer with zero gradient almost everywhere.

use serde::{Deserialize, Serialize};

use super::config::PassRatingConfig;
use super::Pass;
use crate::geom::{Circle, Point, Rectangle, Segment};
use crate::world::{Field, RobotId, Team, Timestamp, World};

// Fraction of the open goal angle a single enemy standing on the shot line removes
const SHOT_BLOCK_STRENGTH: f64 = 0.5;

/// Logistic curve centred on `offset`; rises from ~0.02 to ~0.98 over `width`
#[inline]
pub fn sigmoid(v: f64, offset: f64, width: f64) -> f64 {
    1.0 / (1.0 + (-(v - offset) * (8.0 / width)).exp())
}

/// ~1 inside the rectangle, ~0 outside, smooth across the edges
pub fn rectangle_sigmoid(rect: &Rectangle, p: Point, width: f64) -> f64 {
    sigmoid(p.x, rect.x_min(), width)
        * (1.0 - sigmoid(p.x, rect.x_max(), width))
        * sigmoid(p.y, rect.y_min(), width)
        * (1.0 - sigmoid(p.y, rect.y_max(), width))
}

/// ~1 inside the circle, ~0 outside
pub fn circle_sigmoid(circle: &Circle, p: Point, width: f64) -> f64 {
    1.0 - sigmoid(circle.origin.dist(p), circle.radius, width)
}

/// Breakdown of a pass rating (for logging and analysis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRating {
    pub static_position: f64,
    pub friendly_capability: f64,
    pub enemy_risk: f64,
    pub shoot: f64,
    pub target_region: f64,
    pub speed: f64,
    pub time_offset: f64,
}

impl PassRating {
    /// Overall quality in [0, 1]; non-finite products rate as 0
    pub fn quality(&self) -> f64 {
        let q = self.static_position
            * self.friendly_capability
            * self.enemy_risk
            * self.shoot
            * self.target_region
            * self.speed
            * self.time_offset;
        if q.is_finite() {
            q.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Rate every factor of `pass` against `world`
pub fn evaluate_pass(
    world: &World,
    pass: &Pass,
    target_region: Option<&Rectangle>,
    passer_robot_id: Option<RobotId>,
    config: &PassRatingConfig,
) -> PassRating {
    let now = world.timestamp();
    let time_offset = pass.start_time() - now;

    let speed = sigmoid(pass.speed(), config.min_pass_speed_m_per_s, config.pass_speed_sigmoid_width)
        * (1.0
            - sigmoid(pass.speed(), config.max_pass_speed_m_per_s, config.pass_speed_sigmoid_width));

    let time = sigmoid(
        time_offset,
        config.min_time_offset_for_pass_seconds,
        config.time_offset_sigmoid_width,
    ) * (1.0
        - sigmoid(
            time_offset,
            config.max_time_offset_for_pass_seconds,
            config.time_offset_sigmoid_width,
        ));

    let in_region = match target_region {
        Some(region) => {
            rectangle_sigmoid(region, pass.receiver_point(), config.target_region_sigmoid_width)
        }
        None => 1.0,
    };

    PassRating {
        static_position: static_position_quality(&world.field, pass.receiver_point(), config),
        friendly_capability: rate_pass_friendly_capability(
            &world.friendly_team,
            pass,
            now,
            passer_robot_id,
            config,
        ),
        enemy_risk: rate_pass_enemy_risk(&world.enemy_team, pass, now, config),
        shoot: rate_pass_shoot_score(&world.field, &world.enemy_team, pass, config),
        target_region: in_region,
        speed,
        time_offset: time,
    }
}

/// Quality of `pass` in [0, 1]. Pure: same inputs always give the same rating.
pub fn rate_pass(
    world: &World,
    pass: &Pass,
    target_region: Option<&Rectangle>,
    passer_robot_id: Option<RobotId>,
    config: &PassRatingConfig,
) -> f64 {
    evaluate_pass(world, pass, target_region, passer_robot_id, config).quality()
}

/// How good a receiving position is, ignoring all robots
pub fn static_position_quality(field: &Field, p: Point, config: &PassRatingConfig) -> f64 {
    let playable = field.field_lines().expand(-config.field_edge_margin);
    let on_field = rectangle_sigmoid(&playable, p, config.field_edge_sigmoid_width);

    let near_friendly_goal = circle_sigmoid(
        &Circle::new(field.friendly_goal(), config.friendly_goal_avoid_radius),
        p,
        config.friendly_goal_sigmoid_width,
    );

    on_field * (1.0 - near_friendly_goal)
}

/// Likelihood a friendly robot (other than the passer) reaches the receiver
/// point ahead of the ball.
///
/// With no candidate receivers on the field this is neutral (1.0): the
/// receiving robot is whoever gets sent to the point, not one already there.
pub fn rate_pass_friendly_capability(
    friendly_team: &Team,
    pass: &Pass,
    now: Timestamp,
    passer_robot_id: Option<RobotId>,
    config: &PassRatingConfig,
) -> f64 {
    let fastest_arrival = friendly_team
        .robots()
        .iter()
        .filter(|robot| Some(robot.id) != passer_robot_id)
        .map(|robot| {
            robot.time_to_position(
                pass.receiver_point(),
                config.robot_max_speed_m_per_s,
                config.robot_max_acceleration_m_per_s2,
            )
        })
        .reduce(f64::min);

    let Some(fastest_arrival) = fastest_arrival else {
        return 1.0;
    };

    let time_until_reception = pass.estimate_receive_time() - now;
    sigmoid(
        time_until_reception - fastest_arrival,
        config.receiver_time_buffer_seconds,
        config.receiver_time_sigmoid_width,
    )
}

/// Probability no enemy intercepts the pass or crowds the receiver
pub fn rate_pass_enemy_risk(
    enemy_team: &Team,
    pass: &Pass,
    now: Timestamp,
    config: &PassRatingConfig,
) -> f64 {
    let path = Segment::new(pass.passer_point(), pass.receiver_point());
    let until_kick = pass.start_time() - now;
    let crowd_zone = Circle::new(pass.receiver_point(), config.enemy_proximity_radius);

    enemy_team
        .robots()
        .iter()
        .map(|enemy| {
            let intercept_point = path.closest_point(enemy.position);
            let ball_time = if pass.speed() > 0.0 {
                until_kick + pass.passer_point().dist(intercept_point) / pass.speed()
            } else {
                f64::INFINITY
            };
            let enemy_time = enemy.time_to_position(
                intercept_point,
                config.robot_max_speed_m_per_s,
                config.robot_max_acceleration_m_per_s2,
            );
            let intercept = sigmoid(ball_time - enemy_time, 0.0, config.interception_sigmoid_width);
            let crowding =
                circle_sigmoid(&crowd_zone, enemy.position, config.enemy_proximity_sigmoid_width);
            (1.0 - intercept) * (1.0 - crowding)
        })
        .product()
}

/// How good a shot on the enemy goal is from the receiver point
pub fn rate_pass_shoot_score(
    field: &Field,
    enemy_team: &Team,
    pass: &Pass,
    config: &PassRatingConfig,
) -> f64 {
    let receiver = pass.receiver_point();
    let open_angle = (field.enemy_goalpost_pos() - receiver)
        .angle_between(field.enemy_goalpost_neg() - receiver)
        .to_degrees();

    let shot_line = Segment::new(receiver, field.enemy_goal());
    let unblocked: f64 = enemy_team
        .robots()
        .iter()
        .map(|enemy| {
            let d = shot_line.dist_to_point(enemy.position);
            let shadow = (-(d * d) / (2.0 * config.shot_block_width * config.shot_block_width)).exp();
            1.0 - SHOT_BLOCK_STRENGTH * shadow
        })
        .product();

    sigmoid(
        open_angle * unblocked,
        config.min_shot_open_angle_degrees,
        config.shot_angle_sigmoid_width_degrees,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Angle, Vector};
    use crate::world::Robot;
    use proptest::prelude::*;

    fn empty_world() -> World {
        World::empty(Field::ssl_div_b(), Point::ORIGIN, Timestamp::from_seconds(10.0))
    }

    fn robot(id: RobotId, x: f64, y: f64) -> Robot {
        Robot::new(id, Point::new(x, y), Vector::ZERO, Angle::ZERO, Timestamp::from_seconds(10.0))
    }

    fn pass_to(x: f64, y: f64) -> Pass {
        Pass::new(Point::ORIGIN, Point::new(x, y), 4.5, Timestamp::from_seconds(11.5))
    }

    #[test]
    fn test_sigmoid_shape() {
        assert!((sigmoid(1.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
        assert!(sigmoid(1.25, 1.0, 0.5) > 0.98);
        assert!(sigmoid(0.75, 1.0, 0.5) < 0.02);
        assert_eq!(sigmoid(f64::INFINITY, 0.0, 1.0), 1.0);
        assert_eq!(sigmoid(f64::NEG_INFINITY, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_good_pass_in_open_field_rates_high() {
        let config = PassRatingConfig::default();
        let q = rate_pass(&empty_world(), &pass_to(2.0, 1.0), None, None, &config);
        assert!(q > 0.8, "quality = {q}");
    }

    #[test]
    fn test_pass_off_field_rates_low() {
        let config = PassRatingConfig::default();
        let q = rate_pass(&empty_world(), &pass_to(6.0, 0.0), None, None, &config);
        assert!(q < 0.01, "quality = {q}");
    }

    #[test]
    fn test_pass_in_the_past_rates_low() {
        let config = PassRatingConfig::default();
        let pass = Pass::new(Point::ORIGIN, Point::new(2.0, 1.0), 4.5, Timestamp::from_seconds(9.0));
        assert!(rate_pass(&empty_world(), &pass, None, None, &config) < 0.01);
    }

    #[test]
    fn test_target_region_prefers_inside() {
        let config = PassRatingConfig::default();
        let region = Rectangle::new(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        let world = empty_world();
        let inside = rate_pass(&world, &pass_to(1.5, 1.5), Some(&region), None, &config);
        let outside = rate_pass(&world, &pass_to(-1.5, -1.5), Some(&region), None, &config);
        assert!(inside > 0.5);
        assert!(outside < 0.01);
    }

    #[test]
    fn test_enemy_on_pass_path_lowers_rating() {
        let config = PassRatingConfig::default();
        let clear = empty_world();
        let mut blocked = empty_world();
        blocked.enemy_team.update_robots(vec![robot(1, 1.0, 0.5)]);
        let pass = pass_to(2.0, 1.0);
        let q_clear = rate_pass(&clear, &pass, None, None, &config);
        let q_blocked = rate_pass(&blocked, &pass, None, None, &config);
        assert!(q_blocked < q_clear * 0.5, "{q_blocked} vs {q_clear}");
    }

    #[test]
    fn test_passer_is_not_a_receiver() {
        let config = PassRatingConfig::default();
        let mut world = empty_world();
        // Only friendly robot is the passer itself, standing on the receiver point
        world.friendly_team.update_robots(vec![robot(4, 2.0, 1.0)]);
        let pass = pass_to(2.0, 1.0);
        let with_passer = rate_pass_friendly_capability(
            &world.friendly_team,
            &pass,
            world.timestamp(),
            None,
            &config,
        );
        let excluded = rate_pass_friendly_capability(
            &world.friendly_team,
            &pass,
            world.timestamp(),
            Some(4),
            &config,
        );
        assert!(with_passer > 0.99);
        // Excluding the only robot leaves the neutral rating
        assert_eq!(excluded, 1.0);
    }

    #[test]
    fn test_slow_receiver_lowers_rating() {
        let config = PassRatingConfig::default();
        let mut near = empty_world();
        near.friendly_team.update_robots(vec![robot(1, 2.0, 1.5)]);
        let mut far = empty_world();
        far.friendly_team.update_robots(vec![robot(1, -4.0, -2.5)]);
        let pass = pass_to(2.0, 1.0);
        let q_near = rate_pass(&near, &pass, None, None, &config);
        let q_far = rate_pass(&far, &pass, None, None, &config);
        assert!(q_near > q_far);
    }

    #[test]
    fn test_rating_is_continuous() {
        let config = PassRatingConfig::default();
        let mut world = empty_world();
        world.enemy_team.update_robots(vec![robot(1, 1.0, 0.0), robot(2, 3.0, 1.0)]);
        world.friendly_team.update_robots(vec![robot(3, 2.0, -1.0)]);
        let region = Rectangle::new(Point::new(1.0, -1.0), Point::new(3.0, 1.0));
        let mut x = -4.0;
        while x < 4.0 {
            let a = rate_pass(&world, &pass_to(x, 0.3), Some(&region), Some(0), &config);
            let b = rate_pass(&world, &pass_to(x + 1e-4, 0.3), Some(&region), Some(0), &config);
            assert!((a - b).abs() < 1e-2, "jump at x = {x}: {a} -> {b}");
            x += 0.05;
        }
    }

    proptest! {
        #[test]
        fn prop_rating_in_unit_interval(
            rx in -8.0f64..8.0,
            ry in -6.0f64..6.0,
            px in -5.0f64..5.0,
            py in -3.5f64..3.5,
            speed in 0.0f64..10.0,
            start in 5.0f64..20.0,
            ex in -5.0f64..5.0,
            ey in -3.5f64..3.5,
            fx in -5.0f64..5.0,
            fy in -3.5f64..3.5,
            with_region in any::<bool>(),
        ) {
            let config = PassRatingConfig::default();
            let mut world = empty_world();
            world.enemy_team.update_robots(vec![robot(1, ex, ey)]);
            world.friendly_team.update_robots(vec![robot(2, fx, fy)]);
            let region = Rectangle::new(Point::new(4.0, 0.0), Point::new(5.0, 1.0));
            let pass = Pass::new(Point::new(px, py), Point::new(rx, ry), speed, Timestamp::from_seconds(start));
            let q = rate_pass(&world, &pass, with_region.then_some(&region), Some(2), &config);
            prop_assert!((0.0..=1.0).contains(&q), "quality {} out of range", q);
        }
    }
}
