//! Adam-style gradient descent over a fixed number of parameters
//!
//! The objective is treated as a black box; gradients are approximated with
//! forward finite differences. Each parameter has a weight that is (very
//! roughly) the step taken in that dimension per iteration, so parameters with
//! different units (meters, seconds, m/s) can be optimized together.

/// Optimizer over `N` parameters
#[derive(Debug, Clone)]
pub struct GradientDescentOptimizer<const N: usize> {
    param_weights: [f64; N],
    gradient_approx_step_size: f64,
    past_gradient_decay_rate: f64,
    past_squared_gradient_decay_rate: f64,
}

impl<const N: usize> GradientDescentOptimizer<N> {
    pub const DEFAULT_GRADIENT_APPROX_STEP_SIZE: f64 = 1e-5;
    pub const DEFAULT_PAST_GRADIENT_DECAY_RATE: f64 = 0.9;
    pub const DEFAULT_PAST_SQUARED_GRADIENT_DECAY_RATE: f64 = 0.999;

    // Guards against division by zero when the gradient history is flat
    const EPSILON: f64 = 1e-8;

    pub fn new(param_weights: [f64; N]) -> Self {
        Self::with_rates(
            param_weights,
            Self::DEFAULT_GRADIENT_APPROX_STEP_SIZE,
            Self::DEFAULT_PAST_GRADIENT_DECAY_RATE,
            Self::DEFAULT_PAST_SQUARED_GRADIENT_DECAY_RATE,
        )
    }

    /// # Arguments
    /// - `gradient_approx_step_size`: finite difference step, as a fraction of each
    ///   parameter's weight
    /// - `past_gradient_decay_rate`: decay of the running gradient average (Adam beta1)
    /// - `past_squared_gradient_decay_rate`: decay of the running squared gradient
    ///   average (Adam beta2)
    pub fn with_rates(
        param_weights: [f64; N],
        gradient_approx_step_size: f64,
        past_gradient_decay_rate: f64,
        past_squared_gradient_decay_rate: f64,
    ) -> Self {
        Self {
            param_weights,
            gradient_approx_step_size,
            past_gradient_decay_rate,
            past_squared_gradient_decay_rate,
        }
    }

    pub fn param_weights(&self) -> &[f64; N] {
        &self.param_weights
    }

    /// Run `num_iters` ascent steps on `objective`, starting at `initial_params`
    pub fn maximize<F>(&self, objective: F, initial_params: [f64; N], num_iters: usize) -> [f64; N]
    where
        F: Fn(&[f64; N]) -> f64,
    {
        self.minimize(|params| -objective(params), initial_params, num_iters)
    }

    /// Run `num_iters` descent steps on `objective`, starting at `initial_params`
    pub fn minimize<F>(&self, objective: F, initial_params: [f64; N], num_iters: usize) -> [f64; N]
    where
        F: Fn(&[f64; N]) -> f64,
    {
        let mut params = initial_params;
        let mut past_gradient_averages = [0.0; N];
        let mut past_squared_gradient_averages = [0.0; N];

        let beta1 = self.past_gradient_decay_rate;
        let beta2 = self.past_squared_gradient_decay_rate;

        for iter in 1..=num_iters {
            let gradient = self.approximate_gradient(&objective, &params);

            // Bias correction for the zero-initialized averages
            let beta1_correction = 1.0 - beta1.powi(iter as i32);
            let beta2_correction = 1.0 - beta2.powi(iter as i32);

            for i in 0..N {
                past_gradient_averages[i] =
                    beta1 * past_gradient_averages[i] + (1.0 - beta1) * gradient[i];
                past_squared_gradient_averages[i] = beta2 * past_squared_gradient_averages[i]
                    + (1.0 - beta2) * gradient[i] * gradient[i];

                let m_hat = past_gradient_averages[i] / beta1_correction;
                let v_hat = past_squared_gradient_averages[i] / beta2_correction;

                params[i] -= self.param_weights[i] * m_hat / (v_hat.sqrt() + Self::EPSILON);
            }
        }

        params
    }

    fn approximate_gradient<F>(&self, objective: &F, params: &[f64; N]) -> [f64; N]
    where
        F: Fn(&[f64; N]) -> f64,
    {
        let base = objective(params);
        let mut gradient = [0.0; N];
        for i in 0..N {
            let step = self.gradient_approx_step_size * self.param_weights[i];
            if step == 0.0 {
                continue;
            }
            let mut shifted = *params;
            shifted[i] += step;
            let slope = (objective(&shifted) - base) / step;
            gradient[i] = if slope.is_finite() { slope } else { 0.0 };
        }
        gradient
    }
}
