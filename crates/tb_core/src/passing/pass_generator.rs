//! Continuous pass generation
//!
//! ## General description
//! A [`PassGenerator`] starts a background thread as soon as it is constructed.
//! That thread continuously optimizes, prunes and re-generates a pool of
//! candidate passes, and publishes the best one it knows about. Everything the
//! rest of the system can touch goes through the generator's methods, which
//! only ever exchange whole values with the background thread.
//!
//! ## Locking
//! Every field shared with the background thread has its own mutex in
//! [`SharedState`]. A lock is acquired only by the `SharedState` method that
//! reads or writes that one field, and the guard never outlives that method.
//! Nothing calls a lock-acquiring method while holding a guard, so the two
//! sides cannot deadlock. When adding a shared field, add a matching
//! accessor pair rather than handing out guards.
//!
//! ## Performance
//! A pass is defined in part by its start time. If one iteration takes longer
//! than the control tick, start times chosen by the optimizer are already in
//! the past by the time the pass is used. Iterations slower than
//! `max_iteration_duration_ms` are reported with `warn!`. Test and run the
//! generator with optimized builds.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::config::{PassGeneratorConfig, PassingConfig};
use super::evaluation::rate_pass;
use super::Pass;
use crate::debug_flags::pass_debug_enabled;
use crate::error::PassGeneratorError;
use crate::geom::{Point, Rectangle};
use crate::util::GradientDescentOptimizer;
use crate::world::{RobotId, Timestamp, World};

/// Receiver x, receiver y, speed, start time
pub(crate) const NUM_PARAMS_TO_OPTIMIZE: usize = 4;

pub(crate) type PassArray = [f64; NUM_PARAMS_TO_OPTIMIZE];

/// The parts of a pass the optimizer is allowed to change
pub(crate) fn convert_pass_to_array(pass: &Pass) -> PassArray {
    [
        pass.receiver_point().x,
        pass.receiver_point().y,
        pass.speed(),
        pass.start_time().seconds(),
    ]
}

/// Rebuild a pass from optimizer parameters, kicked from `passer_point`
pub(crate) fn convert_array_to_pass(array: &PassArray, passer_point: Point) -> Pass {
    Pass::new(
        passer_point,
        Point::new(array[0], array[1]),
        array[2],
        Timestamp::from_seconds(array[3]),
    )
}

/// Whether two passes are close enough to be merged into one candidate
pub(crate) fn passes_equal(pass1: &Pass, pass2: &Pass, config: &PassGeneratorConfig) -> bool {
    pass1.receiver_point().dist(pass2.receiver_point()) < config.similar_pass_max_receiver_dist
        && (pass1.start_time() - pass2.start_time()).abs() < config.similar_pass_max_time_diff
        && (pass1.speed() - pass2.speed()).abs() < config.similar_pass_max_speed_diff
}

/// Fields shared between the generator handle and its background thread.
///
/// One mutex per field; each accessor takes exactly one lock and releases it
/// before returning.
struct SharedState {
    in_destructor: Mutex<bool>,
    /// Most recently written world; copied at the start of every iteration
    updated_world: Mutex<World>,
    passer_point: Mutex<Point>,
    passer_robot_id: Mutex<Option<RobotId>>,
    target_region: Mutex<Option<Rectangle>>,
    best_known_pass: Mutex<(Pass, f64)>,
    /// Snapshot of the candidate pool as of the last iteration
    passes_to_optimize: Mutex<Vec<Pass>>,
    iterations_completed: AtomicU64,
    last_iteration_us: AtomicU64,
}

impl SharedState {
    fn new(world: World, passer_point: Point) -> Self {
        let placeholder = Pass::new(passer_point, passer_point, 0.0, world.timestamp());
        Self {
            in_destructor: Mutex::new(false),
            updated_world: Mutex::new(world),
            passer_point: Mutex::new(passer_point),
            passer_robot_id: Mutex::new(None),
            target_region: Mutex::new(None),
            best_known_pass: Mutex::new((placeholder, 0.0)),
            passes_to_optimize: Mutex::new(Vec::new()),
            iterations_completed: AtomicU64::new(0),
            last_iteration_us: AtomicU64::new(0),
        }
    }

    fn in_destructor(&self) -> bool {
        *self.in_destructor.lock()
    }

    fn set_in_destructor(&self) {
        *self.in_destructor.lock() = true;
    }

    fn latest_world(&self) -> World {
        self.updated_world.lock().clone()
    }

    fn set_world(&self, world: World) {
        *self.updated_world.lock() = world;
    }

    fn passer_point(&self) -> Point {
        *self.passer_point.lock()
    }

    fn set_passer_point(&self, passer_point: Point) {
        *self.passer_point.lock() = passer_point;
    }

    fn passer_robot_id(&self) -> Option<RobotId> {
        *self.passer_robot_id.lock()
    }

    fn set_passer_robot_id(&self, robot_id: RobotId) {
        *self.passer_robot_id.lock() = Some(robot_id);
    }

    fn target_region(&self) -> Option<Rectangle> {
        *self.target_region.lock()
    }

    fn set_target_region(&self, area: Option<Rectangle>) {
        *self.target_region.lock() = area;
    }

    fn best_known_pass(&self) -> (Pass, f64) {
        *self.best_known_pass.lock()
    }

    fn set_best_known_pass(&self, best: (Pass, f64)) {
        *self.best_known_pass.lock() = best;
    }

    fn passes_to_optimize(&self) -> Vec<Pass> {
        self.passes_to_optimize.lock().clone()
    }

    fn set_passes_to_optimize(&self, passes: Vec<Pass>) {
        *self.passes_to_optimize.lock() = passes;
    }
}

/// Inputs held fixed for one optimization iteration
struct IterationContext {
    world: World,
    passer_point: Point,
    passer_robot_id: Option<RobotId>,
    target_region: Option<Rectangle>,
}

/// Background half of the generator. Owns the working pool; only talks to the
/// handle through [`SharedState`].
struct PassOptimizer {
    shared: Arc<SharedState>,
    config: PassingConfig,
    optimizer: GradientDescentOptimizer<NUM_PARAMS_TO_OPTIMIZE>,
    rng: ChaCha8Rng,
    passes: Vec<Pass>,
    slow_iterations: u64,
}

impl PassOptimizer {
    fn new(shared: Arc<SharedState>, config: PassingConfig) -> Self {
        let g = &config.generator;
        let optimizer = GradientDescentOptimizer::new([
            g.pass_space_weight,
            g.pass_space_weight,
            g.pass_speed_weight,
            g.pass_time_weight,
        ]);
        let rng = match g.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { shared, config, optimizer, rng, passes: Vec::new(), slow_iterations: 0 }
    }

    fn iteration_context(&self) -> IterationContext {
        IterationContext {
            world: self.shared.latest_world(),
            passer_point: self.shared.passer_point(),
            passer_robot_id: self.shared.passer_robot_id(),
            target_region: self.shared.target_region(),
        }
    }

    fn rate(&self, pass: &Pass, ctx: &IterationContext) -> f64 {
        rate_pass(
            &ctx.world,
            pass,
            ctx.target_region.as_ref(),
            ctx.passer_robot_id,
            &self.config.rating,
        )
    }

    /// Fill the pool with random passes and publish an initial best
    fn initialize_passes(&mut self) {
        let ctx = self.iteration_context();
        let num_passes = self.config.generator.num_passes_to_optimize;
        self.passes = self.generate_passes(num_passes, &ctx, &[]);
        self.save_best_pass(&ctx);
    }

    /// Runs until the handle is dropped
    fn continuously_generate_passes(mut self) {
        debug!(
            pool_size = self.config.generator.num_passes_to_optimize,
            "pass generation started"
        );
        let max_duration = Duration::from_millis(self.config.generator.max_iteration_duration_ms);

        while !self.shared.in_destructor() {
            let started = Instant::now();
            self.run_iteration();
            let elapsed = started.elapsed();

            self.shared
                .last_iteration_us
                .store(elapsed.as_micros() as u64, Ordering::Relaxed);
            let iterations = self.shared.iterations_completed.fetch_add(1, Ordering::AcqRel) + 1;

            if elapsed > max_duration {
                self.slow_iterations += 1;
                if self.slow_iterations == 1 || self.slow_iterations % 100 == 0 {
                    warn!(
                        elapsed_us = elapsed.as_micros() as u64,
                        budget_ms = max_duration.as_millis() as u64,
                        slow_iterations = self.slow_iterations,
                        "pass generation iteration over budget; pass start times may be stale"
                    );
                }
            }
            trace!(iterations, elapsed_us = elapsed.as_micros() as u64, "pass generation iteration");
        }

        debug!(
            iterations = self.shared.iterations_completed.load(Ordering::Acquire),
            "pass generation stopped"
        );
    }

    fn run_iteration(&mut self) {
        // Every candidate in this iteration is rated against the same world
        let ctx = self.iteration_context();

        self.update_passer_point_of_all_passes(ctx.passer_point);
        self.optimize_passes(&ctx);
        self.prune_and_replace_passes(&ctx);
        self.save_best_pass(&ctx);
    }

    fn update_passer_point_of_all_passes(&mut self, passer_point: Point) {
        for pass in self.passes.iter_mut() {
            *pass = pass.with_passer_point(passer_point);
        }
    }

    /// A few gradient steps on every pass; a step that made a pass worse is discarded
    fn optimize_passes(&mut self, ctx: &IterationContext) {
        let num_steps = self.config.generator.num_gradient_descent_steps_per_iter;
        let mut optimized = Vec::with_capacity(self.passes.len());

        for pass in &self.passes {
            let objective =
                |params: &PassArray| self.rate(&convert_array_to_pass(params, ctx.passer_point), ctx);
            let params = self.optimizer.maximize(objective, convert_pass_to_array(pass), num_steps);
            let candidate = convert_array_to_pass(&params, ctx.passer_point);

            if self.rate(&candidate, ctx) >= self.rate(pass, ctx) {
                optimized.push(candidate);
            } else {
                optimized.push(*pass);
            }
        }

        self.passes = optimized;
    }

    /// Sort by quality, merge near-duplicates, keep the best few and refill
    /// the pool with fresh random passes
    fn prune_and_replace_passes(&mut self, ctx: &IterationContext) {
        let num_to_keep = self.config.generator.num_passes_to_keep_after_pruning;
        let num_to_optimize = self.config.generator.num_passes_to_optimize;

        let mut rated: Vec<(Pass, f64)> =
            self.passes.iter().map(|pass| (*pass, self.rate(pass, ctx))).collect();
        rated.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut kept: Vec<Pass> = Vec::with_capacity(num_to_optimize);
        for (pass, _) in rated {
            if kept.len() >= num_to_keep {
                break;
            }
            if !kept.iter().any(|k| passes_equal(k, &pass, &self.config.generator)) {
                kept.push(pass);
            }
        }

        let num_new = num_to_optimize.saturating_sub(kept.len());
        let fresh = self.generate_passes(num_new, ctx, &kept);
        kept.extend(fresh);
        self.passes = kept;
    }

    /// Publish the best pass in the pool (and a snapshot of the pool)
    fn save_best_pass(&self, ctx: &IterationContext) {
        let best = self
            .passes
            .iter()
            .map(|pass| (*pass, self.rate(pass, ctx)))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        if pass_debug_enabled() {
            for pass in &self.passes {
                debug!(quality = self.rate(pass, ctx), "candidate {}", pass);
            }
        }

        if let Some(best) = best {
            self.shared.set_best_known_pass(best);
        }
        self.shared.set_passes_to_optimize(self.passes.clone());
    }

    /// Uniformly random passes that are not near-duplicates of `existing` or
    /// of each other.
    ///
    /// Receivers are drawn from the field, and (for a share of the passes) from
    /// the part of the target region on the field. May return fewer than
    /// `num_passes_to_gen` if the pool is already crowded.
    fn generate_passes(
        &mut self,
        num_passes_to_gen: usize,
        ctx: &IterationContext,
        existing: &[Pass],
    ) -> Vec<Pass> {
        let g = &self.config.generator;
        let r = &self.config.rating;
        let field_area = ctx.world.field.field_lines();
        let region_on_field = ctx.target_region.and_then(|region| region.intersection(&field_area));
        let now = ctx.world.timestamp();

        let mut passes: Vec<Pass> = Vec::with_capacity(num_passes_to_gen);
        let max_attempts = num_passes_to_gen * 4;
        let mut attempts = 0;

        while passes.len() < num_passes_to_gen && attempts < max_attempts {
            attempts += 1;

            let area = match region_on_field {
                Some(region) if self.rng.gen_bool(g.target_region_generation_fraction) => region,
                _ => field_area,
            };
            let receiver_point = Point::new(
                self.rng.gen_range(area.x_min()..=area.x_max()),
                self.rng.gen_range(area.y_min()..=area.y_max()),
            );
            let speed = self.rng.gen_range(r.min_pass_speed_m_per_s..=r.max_pass_speed_m_per_s);
            let start_time = now
                + self.rng.gen_range(
                    r.min_time_offset_for_pass_seconds..=r.max_time_offset_for_pass_seconds,
                );
            let pass = Pass::new(ctx.passer_point, receiver_point, speed, start_time);

            if existing.iter().chain(passes.iter()).any(|p| passes_equal(p, &pass, g)) {
                continue;
            }
            passes.push(pass);
        }

        passes
    }
}

/// Reports whether a generator's background thread still exists.
///
/// Holds no strong reference, so it can outlive the generator.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    shared: Weak<SharedState>,
}

impl LivenessProbe {
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("iterations_completed", &self.iterations_completed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Continuously searches for good passes in a background thread.
///
/// Not `Clone`: each generator owns exactly one background thread, which is
/// stopped and joined when the generator is dropped.
pub struct PassGenerator {
    shared: Arc<SharedState>,
    pass_generation_thread: Option<JoinHandle<()>>,
}

impl PassGenerator {
    /// Start generating passes from `passer_point` with the default configuration
    pub fn new(world: World, passer_point: Point) -> Result<Self, PassGeneratorError> {
        Self::with_config(world, passer_point, PassingConfig::default())
    }

    /// Start generating passes from `passer_point`.
    ///
    /// The pool is filled with random passes and the background thread is
    /// started before this returns. There is no target region and no passer
    /// robot until set.
    pub fn with_config(
        world: World,
        passer_point: Point,
        config: PassingConfig,
    ) -> Result<Self, PassGeneratorError> {
        config.validate()?;

        let shared = Arc::new(SharedState::new(world, passer_point));
        let mut pass_optimizer = PassOptimizer::new(Arc::clone(&shared), config);
        pass_optimizer.initialize_passes();

        let handle = thread::Builder::new()
            .name("pass-generator".to_string())
            .spawn(move || pass_optimizer.continuously_generate_passes())?;

        Ok(Self { shared, pass_generation_thread: Some(handle) })
    }

    /// Replace the world used by the optimizer.
    ///
    /// Takes effect at the start of the next iteration; an iteration already
    /// running finishes against the world it started with.
    pub fn set_world(&self, world: World) {
        self.shared.set_world(world);
    }

    /// Update the point passes are kicked from
    pub fn set_passer_point(&self, passer_point: Point) {
        self.shared.set_passer_point(passer_point);
    }

    /// Ignore this (friendly) robot when looking for receivers
    pub fn set_passer_robot_id(&self, robot_id: RobotId) {
        self.shared.set_passer_robot_id(robot_id);
    }

    /// Restrict receivers to `area`; `None` removes the restriction
    pub fn set_target_region(&self, area: Option<Rectangle>) {
        self.shared.set_target_region(area);
    }

    /// The best pass known so far and its quality in [0, 1].
    ///
    /// Only what is known *so far*: directly after construction or a world
    /// change the quality is likely to be low. Let the optimizer run for some
    /// iterations before relying on it.
    pub fn get_best_pass_so_far(&self) -> (Pass, f64) {
        self.shared.best_known_pass()
    }

    /// Candidate pool as of the last completed iteration
    pub fn candidate_pool(&self) -> Vec<Pass> {
        self.shared.passes_to_optimize()
    }

    pub fn iterations_completed(&self) -> u64 {
        self.shared.iterations_completed.load(Ordering::Acquire)
    }

    pub fn last_iteration_duration(&self) -> Duration {
        Duration::from_micros(self.shared.last_iteration_us.load(Ordering::Relaxed))
    }

    /// Block until at least `num_iterations` more iterations have completed.
    ///
    /// Returns `false` if `timeout` passed first.
    pub fn wait_for_iterations(&self, num_iterations: u64, timeout: Duration) -> bool {
        let target = self.iterations_completed() + num_iterations;
        let deadline = Instant::now() + timeout;
        while self.iterations_completed() < target {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    pub fn liveness_probe(&self) -> LivenessProbe {
        LivenessProbe { shared: Arc::downgrade(&self.shared) }
    }
}

impl std::fmt::Debug for PassGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassGenerator").field("shared", &self.shared).finish()
    }
}

impl Drop for PassGenerator {
    fn drop(&mut self) {
        self.shared.set_in_destructor();
        if let Some(handle) = self.pass_generation_thread.take() {
            if handle.join().is_err() {
                warn!("pass generation thread panicked");
            }
        }
    }
}
