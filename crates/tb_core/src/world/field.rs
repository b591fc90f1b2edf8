use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rectangle};

/// Field dimensions (meters). Friendly goal is on the -x side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Length along x, goal line to goal line
    pub x_length: f64,
    /// Width along y, touch line to touch line
    pub y_length: f64,
    pub goal_width: f64,
    pub defense_x_length: f64,
    pub defense_y_length: f64,
    pub center_circle_radius: f64,
}

impl Field {
    /// 9m x 6m division B field
    pub fn ssl_div_b() -> Self {
        Self {
            x_length: 9.0,
            y_length: 6.0,
            goal_width: 1.0,
            defense_x_length: 1.0,
            defense_y_length: 2.0,
            center_circle_radius: 0.5,
        }
    }

    /// 12m x 9m division A field
    pub fn ssl_div_a() -> Self {
        Self {
            x_length: 12.0,
            y_length: 9.0,
            goal_width: 1.8,
            defense_x_length: 1.8,
            defense_y_length: 3.6,
            center_circle_radius: 0.5,
        }
    }

    /// The playing area inside the field lines
    pub fn field_lines(&self) -> Rectangle {
        Rectangle::new(
            Point::new(-self.x_length / 2.0, -self.y_length / 2.0),
            Point::new(self.x_length / 2.0, self.y_length / 2.0),
        )
    }

    pub fn friendly_goal(&self) -> Point {
        Point::new(-self.x_length / 2.0, 0.0)
    }

    pub fn enemy_goal(&self) -> Point {
        Point::new(self.x_length / 2.0, 0.0)
    }

    pub fn enemy_goalpost_pos(&self) -> Point {
        Point::new(self.x_length / 2.0, self.goal_width / 2.0)
    }

    pub fn enemy_goalpost_neg(&self) -> Point {
        Point::new(self.x_length / 2.0, -self.goal_width / 2.0)
    }

    pub fn friendly_defense_area(&self) -> Rectangle {
        let goal_line = -self.x_length / 2.0;
        Rectangle::new(
            Point::new(goal_line, -self.defense_y_length / 2.0),
            Point::new(goal_line + self.defense_x_length, self.defense_y_length / 2.0),
        )
    }

    pub fn enemy_defense_area(&self) -> Rectangle {
        let goal_line = self.x_length / 2.0;
        Rectangle::new(
            Point::new(goal_line - self.defense_x_length, -self.defense_y_length / 2.0),
            Point::new(goal_line, self.defense_y_length / 2.0),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        self.field_lines().contains(p)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::ssl_div_b()
    }
}
