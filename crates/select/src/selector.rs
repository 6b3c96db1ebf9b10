use crate::errors::Result;

/// A strategy choosing, one at a time, the next input at which the unknown
/// function has to be sampled.
///
/// A campaign goes as follows: `reset`, initial points, then repeatedly
/// `has_next_input` / `get_next_input`, the caller sampling the function
/// and reporting the result with `inform` (or `inform_failure` when the
/// sampling attempt turned out to be invalid).
pub trait SamplingPointSelector {
    /// Start a new campaign providing `n_points` points at most
    fn reset(&mut self, n_points: usize) -> Result<()>;

    /// Sets the already known samples as parallel inputs and outputs sequences
    fn set_initial_points(&mut self, inputs: &[f64], outputs: &[f64]) -> Result<()>;

    /// Replaces the already known samples given as (input, output) pairs
    fn set_sampled_points(&mut self, points: &[(f64, f64)]) -> Result<()>;

    /// Records the result of a sampling
    fn inform(&mut self, input: f64, output: f64) -> Result<()>;

    /// Records an attempted but invalid sampling at `input`
    fn inform_failure(&mut self, input: f64) -> Result<()>;

    /// Whether another input can be suggested
    fn has_next_input(&mut self) -> bool;

    /// Next input to sample
    fn get_next_input(&mut self) -> Result<f64>;
}
