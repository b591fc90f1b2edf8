use serde::{Deserialize, Serialize};
use std::fmt;

/// Regions the navigator keeps a robot out of while carrying out an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvoidArea {
    EnemyRobots,
    FriendlyDefenseArea,
    EnemyDefenseArea,
    CenterCircle,
    HalfMetreAroundBall,
    Ball,
}

impl AvoidArea {
    pub const ALL: [AvoidArea; 6] = [
        AvoidArea::EnemyRobots,
        AvoidArea::FriendlyDefenseArea,
        AvoidArea::EnemyDefenseArea,
        AvoidArea::CenterCircle,
        AvoidArea::HalfMetreAroundBall,
        AvoidArea::Ball,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AvoidArea::EnemyRobots => "Enemy Robots",
            AvoidArea::FriendlyDefenseArea => "Friendly Defense Area",
            AvoidArea::EnemyDefenseArea => "Enemy Defense Area",
            AvoidArea::CenterCircle => "Center Circle",
            AvoidArea::HalfMetreAroundBall => "Half Metre Around Ball",
            AvoidArea::Ball => "Ball",
        }
    }
}

impl fmt::Display for AvoidArea {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
