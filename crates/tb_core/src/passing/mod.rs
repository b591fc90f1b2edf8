//! Pass representation, rating and the continuous pass generator

mod config;
mod evaluation;
mod pass;
mod pass_generator;

pub use config::{PassGeneratorConfig, PassRatingConfig, PassingConfig};
pub use evaluation::{evaluate_pass, rate_pass, PassRating};
pub use pass::Pass;
pub use pass_generator::{LivenessProbe, PassGenerator};
