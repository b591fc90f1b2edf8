//! Pass generator and pass rating configuration
//!
//! All tuning constants for pass search live here so they can be adjusted (or
//! loaded from JSON) without touching the optimization code.
//!
//! ```rust
//! use tb_core::passing::PassingConfig;
//!
//! let config = PassingConfig::default();
//! let fast = PassingConfig::fast();
//! assert!(fast.generator.num_passes_to_optimize < config.generator.num_passes_to_optimize);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Pool size, search step and pruning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassGeneratorConfig {
    /// Passes kept in the candidate pool after replenishing (default: 50)
    pub num_passes_to_optimize: usize,
    /// Best passes surviving each pruning round (default: 10)
    pub num_passes_to_keep_after_pruning: usize,
    /// Gradient steps each candidate gets per iteration (default: 5)
    pub num_gradient_descent_steps_per_iter: usize,

    // Roughly the step gradient descent takes per iteration in each dimension.
    // Tuned for fast convergence without oscillation.
    /// Receiver x/y step (m) (default: 0.1)
    pub pass_space_weight: f64,
    /// Pass speed step (m/s) (default: 0.05)
    pub pass_speed_weight: f64,
    /// Start time step (s) (default: 0.05)
    pub pass_time_weight: f64,

    // === Near-duplicate thresholds (passes closer than all three are merged) ===
    /// Receiver point distance (m) (default: 0.3)
    pub similar_pass_max_receiver_dist: f64,
    /// Start time difference (s) (default: 0.1)
    pub similar_pass_max_time_diff: f64,
    /// Speed difference (m/s) (default: 0.3)
    pub similar_pass_max_speed_diff: f64,

    /// Share of fresh candidates drawn inside the target region when one is set (default: 0.5)
    pub target_region_generation_fraction: f64,
    /// Iterations slower than this are reported; passes go stale past the tick period (default: 15ms)
    pub max_iteration_duration_ms: u64,
    /// Seed for candidate generation; `None` seeds from OS entropy
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for PassGeneratorConfig {
    fn default() -> Self {
        Self {
            num_passes_to_optimize: 50,
            num_passes_to_keep_after_pruning: 10,
            num_gradient_descent_steps_per_iter: 5,

            pass_space_weight: 0.1,
            pass_speed_weight: 0.05,
            pass_time_weight: 0.05,

            similar_pass_max_receiver_dist: 0.3,
            similar_pass_max_time_diff: 0.1,
            similar_pass_max_speed_diff: 0.3,

            target_region_generation_fraction: 0.5,
            max_iteration_duration_ms: 15,
            random_seed: None,
        }
    }
}

/// Constants of the pass quality function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRatingConfig {
    // === Pass feasibility ===
    /// Slowest useful pass (m/s) (default: 3.5)
    pub min_pass_speed_m_per_s: f64,
    /// Fastest pass a robot can reliably receive (m/s) (default: 5.5)
    pub max_pass_speed_m_per_s: f64,
    pub pass_speed_sigmoid_width: f64,
    /// Earliest start time relative to now (s) (default: 0.5)
    pub min_time_offset_for_pass_seconds: f64,
    /// Latest start time relative to now (s) (default: 4.0)
    pub max_time_offset_for_pass_seconds: f64,
    pub time_offset_sigmoid_width: f64,

    // === Robot kinematics ===
    pub robot_max_speed_m_per_s: f64,
    pub robot_max_acceleration_m_per_s2: f64,

    // === Friendly capability ===
    /// How early the receiver should arrive before the ball (s) (default: 0.25)
    pub receiver_time_buffer_seconds: f64,
    pub receiver_time_sigmoid_width: f64,

    // === Enemy risk ===
    /// Seconds of ball-vs-enemy arrival difference over which interception
    /// goes from likely to unlikely (default: 1.0)
    pub interception_sigmoid_width: f64,
    /// Enemies inside this radius of the receiver point crowd the reception (default: 0.5)
    pub enemy_proximity_radius: f64,
    pub enemy_proximity_sigmoid_width: f64,

    // === Static position ===
    pub field_edge_margin: f64,
    pub field_edge_sigmoid_width: f64,
    /// Receivers this close to our own goal are penalized (default: 1.5)
    pub friendly_goal_avoid_radius: f64,
    pub friendly_goal_sigmoid_width: f64,

    // === Target region ===
    pub target_region_sigmoid_width: f64,

    // === Shooting after reception ===
    /// Open goal angle (deg) where a shot becomes worth taking (default: 5.0)
    pub min_shot_open_angle_degrees: f64,
    pub shot_angle_sigmoid_width_degrees: f64,
    /// Lateral spread (m) of an enemy's shadow on the shot line (default: 0.3)
    pub shot_block_width: f64,
}

impl Default for PassRatingConfig {
    fn default() -> Self {
        Self {
            min_pass_speed_m_per_s: 3.5,
            max_pass_speed_m_per_s: 5.5,
            pass_speed_sigmoid_width: 0.2,
            min_time_offset_for_pass_seconds: 0.5,
            max_time_offset_for_pass_seconds: 4.0,
            time_offset_sigmoid_width: 0.5,

            robot_max_speed_m_per_s: 2.0,
            robot_max_acceleration_m_per_s2: 3.0,

            receiver_time_buffer_seconds: 0.25,
            receiver_time_sigmoid_width: 0.5,

            interception_sigmoid_width: 1.0,
            enemy_proximity_radius: 0.5,
            enemy_proximity_sigmoid_width: 0.5,

            field_edge_margin: 0.1,
            field_edge_sigmoid_width: 0.2,
            friendly_goal_avoid_radius: 1.5,
            friendly_goal_sigmoid_width: 0.5,

            target_region_sigmoid_width: 0.5,

            min_shot_open_angle_degrees: 5.0,
            shot_angle_sigmoid_width_degrees: 10.0,
            shot_block_width: 0.3,
        }
    }
}

/// Full passing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PassingConfig {
    pub generator: PassGeneratorConfig,
    #[serde(default)]
    pub rating: PassRatingConfig,
}

impl PassingConfig {
    /// Match play defaults
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Smaller pool, fewer steps; for slow hardware or many concurrent generators
    pub fn fast() -> Self {
        let mut cfg = Self::default();
        cfg.generator.num_passes_to_optimize = 20;
        cfg.generator.num_passes_to_keep_after_pruning = 5;
        cfg.generator.num_gradient_descent_steps_per_iter = 3;
        cfg
    }

    /// Seeded candidate generation (tests, benchmarks)
    pub fn deterministic(seed: u64) -> Self {
        let mut cfg = Self::default();
        cfg.generator.random_seed = Some(seed);
        cfg
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the configuration is internally consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generator;
        let r = &self.rating;

        if g.num_passes_to_optimize == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if g.num_passes_to_keep_after_pruning > g.num_passes_to_optimize {
            return Err(ConfigError::KeepExceedsPool {
                keep: g.num_passes_to_keep_after_pruning,
                pool: g.num_passes_to_optimize,
            });
        }
        for (name, value) in [
            ("pass_space_weight", g.pass_space_weight),
            ("pass_speed_weight", g.pass_speed_weight),
            ("pass_time_weight", g.pass_time_weight),
            ("robot_max_speed_m_per_s", r.robot_max_speed_m_per_s),
            ("robot_max_acceleration_m_per_s2", r.robot_max_acceleration_m_per_s2),
            ("pass_speed_sigmoid_width", r.pass_speed_sigmoid_width),
            ("time_offset_sigmoid_width", r.time_offset_sigmoid_width),
            ("receiver_time_sigmoid_width", r.receiver_time_sigmoid_width),
            ("interception_sigmoid_width", r.interception_sigmoid_width),
            ("enemy_proximity_sigmoid_width", r.enemy_proximity_sigmoid_width),
            ("field_edge_sigmoid_width", r.field_edge_sigmoid_width),
            ("friendly_goal_sigmoid_width", r.friendly_goal_sigmoid_width),
            ("target_region_sigmoid_width", r.target_region_sigmoid_width),
            ("shot_angle_sigmoid_width_degrees", r.shot_angle_sigmoid_width_degrees),
            ("shot_block_width", r.shot_block_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        if !(0.0..=1.0).contains(&g.target_region_generation_fraction) {
            return Err(ConfigError::InvalidValue {
                name: "target_region_generation_fraction",
                value: g.target_region_generation_fraction,
            });
        }
        if !(0.0 <= r.min_pass_speed_m_per_s && r.min_pass_speed_m_per_s < r.max_pass_speed_m_per_s)
        {
            return Err(ConfigError::range(
                "pass speed",
                r.min_pass_speed_m_per_s,
                r.max_pass_speed_m_per_s,
            ));
        }
        if !(0.0 <= r.min_time_offset_for_pass_seconds
            && r.min_time_offset_for_pass_seconds < r.max_time_offset_for_pass_seconds)
        {
            return Err(ConfigError::range(
                "pass time offset",
                r.min_time_offset_for_pass_seconds,
                r.max_time_offset_for_pass_seconds,
            ));
        }
        Ok(())
    }
}

// ========== Tests ==========
