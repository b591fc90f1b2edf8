//! Reusable building blocks that tactics call once per tick to produce intents

mod move_action;

pub use move_action::MoveAction;
