use super::Intent;
use crate::geom::{Angle, Point};

/// Double dispatch over intent variants.
///
/// Each method receives the whole intent (robot, priority, areas to avoid) and
/// the variant payload. Adding a variant adds a method here, so every visitor
/// is forced to handle it.
pub trait IntentVisitor {
    fn visit_move(
        &mut self,
        intent: &Intent,
        destination: Point,
        final_angle: Angle,
        final_speed: f64,
    );

    fn visit_shoot(&mut self, intent: &Intent, kick_origin: Point, kick_direction: Angle, kick_speed: f64);

    fn visit_chip(
        &mut self,
        intent: &Intent,
        chip_origin: Point,
        chip_direction: Angle,
        chip_distance_meters: f64,
    );

    fn visit_pivot(&mut self, intent: &Intent, pivot_point: Point, final_angle: Angle, enable_dribbler: bool);

    fn visit_stop(&mut self, intent: &Intent, coast: bool);
}
