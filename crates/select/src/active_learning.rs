//! Active learning sampling point selection.
//!
//! The next input is the feasible candidate of a fixed grid maximizing the
//! smoothed predictive variance of an [UncertaintyModel] trained on all known
//! samples, among candidates far enough from already occupied grid cells.
//!
//! The enforced spacing, expressed in grid cells, decays linearly with the
//! number of provided points:
//!
//! `max(round(max(1 - k / ((n_final - n_initial) * stop), min) * distance_factor), 1)`
//!
//! where `k` is the number of points provided so far and `(stop, min)` are the
//! decay parameters. When no candidate honors the spacing, both decay
//! parameters are halved, for good, and the search is retried.
//!
//! ```
//! use samplebox_select::{ActiveLearningSelector, SamplingPointSelector, SelectorConfig};
//!
//! fn f(x: f64) -> f64 {
//!     (x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
//! }
//!
//! let mut selector = ActiveLearningSelector::new(SelectorConfig::default().seed(42))
//!     .expect("selector created");
//! selector.reset(3).expect("campaign started");
//!
//! let inputs: Vec<f64> = (0..15).map(|i| 25. * i as f64 / 14.).collect();
//! let outputs: Vec<f64> = inputs.iter().map(|x| f(*x)).collect();
//! selector.set_initial_points(&inputs, &outputs).expect("initial points set");
//! selector.set_feasible_regions(&[0.], &[25.]).expect("grid built");
//!
//! while selector.has_next_input() {
//!     let x = selector.get_next_input().expect("next input");
//!     selector.inform(x, f(x)).expect("result recorded");
//! }
//! assert_eq!(selector.current_index(), 3);
//! ```
use crate::config::SelectorConfig;
use crate::errors::{Result, SelectError};
use crate::grid::CandidateGrid;
use crate::selector::SamplingPointSelector;
use crate::smoothing::{convolve_same, gaussian_window};
use crate::surrogate::{ForestBuilder, UncertaintyBuilder};

use env_logger::{Builder, Env};
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView2, Axis, array, concatenate, s, stack};
use ndarray_rand::rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

/// Parameters of the spacing constraint decay.
///
/// Both only ever shrink during a campaign, they are restored by `reset` only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decay {
    stop_percentage: f64,
    min_percentage: f64,
}

impl Decay {
    fn new(config: &SelectorConfig) -> Self {
        Decay {
            stop_percentage: config.stop_percentage,
            min_percentage: config.min_percentage,
        }
    }

    /// Fraction of the campaign after which the linear decay reaches its floor
    pub fn stop_percentage(&self) -> f64 {
        self.stop_percentage
    }

    /// Floor of the linear decay
    pub fn min_percentage(&self) -> f64 {
        self.min_percentage
    }

    /// Minimal distance in grid cells between a candidate and occupied cells
    /// after `current_index` provided points
    pub fn min_index_distance(&self, current_index: usize, config: &SelectorConfig) -> usize {
        let span = (config.n_final_points - config.n_initial_points) as f64 * self.stop_percentage;
        let ratio = (1. - 1. / span * current_index as f64).max(self.min_percentage);
        ((ratio * config.distance_factor).round() as usize).max(1)
    }

    fn is_exhausted(&self, floor: f64) -> bool {
        self.stop_percentage <= floor && self.min_percentage <= floor
    }

    fn halve(&mut self) {
        self.stop_percentage /= 2.;
        self.min_percentage /= 2.;
    }
}

/// Feasible indices at least `min_dist` cells away from every `occupied` index.
/// `occupied` must be sorted.
fn spaced_candidates(feasible: &[usize], occupied: &[usize], min_dist: usize) -> Vec<usize> {
    feasible
        .iter()
        .copied()
        .filter(|&i| {
            let p = occupied.partition_point(|&o| o < i);
            let right_ok = p == occupied.len() || occupied[p] - i >= min_dist;
            let left_ok = p == 0 || i - occupied[p - 1] >= min_dist;
            left_ok && right_ok
        })
        .collect()
}

/// Candidate with the greatest score, the first one on ties
fn argmax_among(candidates: &[usize], scores: &Array1<f64>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &i in candidates {
        match best {
            Some(b) if !(scores[i] > scores[b]) => (),
            _ => best = Some(i),
        }
    }
    best
}

/// Active learning selector
///
/// The selector is unusable until the following call sequence is followed:
/// `reset`, `set_initial_points`, `set_feasible_regions`, then repeatedly
/// `get_next_input` and `inform`.
pub struct ActiveLearningSelector<B: UncertaintyBuilder = ForestBuilder> {
    config: SelectorConfig,
    builder: B,
    rng: Xoshiro256Plus,
    /// Target number of points of the campaign
    points_to_provide: usize,
    /// Number of points provided so far
    current_index: usize,
    /// Known samples as a (n, 2) matrix of [input, output] rows
    sampled_points: Option<Array2<f64>>,
    grid: Option<CandidateGrid>,
    /// Occupied grid cells, may contain duplicates
    sample_point_indices: Vec<usize>,
    decay: Decay,
}

impl ActiveLearningSelector<ForestBuilder> {
    /// Constructor of a selector relying on a regression forest with default
    /// hyperparameters as uncertainty model.
    pub fn new(config: SelectorConfig) -> Result<Self> {
        Self::new_with_builder(config, ForestBuilder::default())
    }
}

impl<B: UncertaintyBuilder> ActiveLearningSelector<B> {
    /// Constructor given the uncertainty model trainer
    pub fn new_with_builder(config: SelectorConfig, builder: B) -> Result<Self> {
        let env = Env::new().filter_or("SAMPLEBOX_LOG", "info");
        let mut log_builder = Builder::from_env(env);
        let log_builder = log_builder.target(env_logger::Target::Stdout);
        log_builder.try_init().ok();

        let config = config.check()?;
        let rng = match config.seed {
            Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
            None => Xoshiro256Plus::from_entropy(),
        };
        Ok(ActiveLearningSelector {
            decay: Decay::new(&config),
            config,
            builder,
            rng,
            points_to_provide: 0,
            current_index: 0,
            sampled_points: None,
            grid: None,
            sample_point_indices: vec![],
        })
    }

    /// Selector configuration
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Candidate grid, available once feasible regions are set
    pub fn grid(&self) -> Option<&CandidateGrid> {
        self.grid.as_ref()
    }

    /// Indices of grid candidates lying in feasible regions
    pub fn feasible_indices(&self) -> &[usize] {
        self.grid.as_ref().map_or(&[], |g| g.feasible_indices())
    }

    /// Occupied grid indices, one per sample or failed attempt
    pub fn sample_point_indices(&self) -> &[usize] {
        &self.sample_point_indices
    }

    /// Known samples as (n, 2) matrix of [input, output] rows
    pub fn sampled_points(&self) -> Option<ArrayView2<'_, f64>> {
        self.sampled_points.as_ref().map(|p| p.view())
    }

    /// Number of points provided during the current campaign
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Target number of points of the current campaign
    pub fn points_to_provide(&self) -> usize {
        self.points_to_provide
    }

    /// Current decay parameters
    pub fn decay(&self) -> Decay {
        self.decay
    }

    /// Current stop percentage decay parameter
    pub fn stop_percentage(&self) -> f64 {
        self.decay.stop_percentage
    }

    /// Current min percentage decay parameter
    pub fn min_percentage(&self) -> f64 {
        self.decay.min_percentage
    }

    /// Spacing the next suggestion will honor unless the decay parameters shrink
    pub fn min_index_distance(&self) -> usize {
        self.decay.min_index_distance(self.current_index, &self.config)
    }

    /// Sets the feasible regions `[lowers[i], uppers[i]]`, builds the candidate
    /// grid and marks the grid cells nearest to already known samples as occupied.
    pub fn set_feasible_regions(&mut self, lowers: &[f64], uppers: &[f64]) -> Result<()> {
        let Some(sampled) = self.sampled_points.as_ref() else {
            return Err(SelectError::PreconditionError(
                "initial points must be set before feasible regions".to_string(),
            ));
        };
        if self.grid.is_some() {
            return Err(SelectError::PreconditionError(
                "feasible regions are already set for this campaign".to_string(),
            ));
        }
        let grid = CandidateGrid::new(lowers, uppers, self.config.grid_resolution)?;

        let mut indices: Vec<usize> = sampled.column(0).iter().map(|x| grid.snap(*x)).collect();
        indices.sort_unstable();
        indices.dedup();
        info!(
            "Grid of {} candidates over [{}, {}], {} feasible, {} occupied",
            grid.len(),
            grid.value(0),
            grid.value(grid.len() - 1),
            grid.feasible_indices().len(),
            indices.len()
        );

        self.sample_point_indices = indices;
        self.grid = Some(grid);
        Ok(())
    }

    /// Smoothed predictive variance over the grid of a model trained on known samples
    fn smoothed_variance(
        &self,
        grid: &CandidateGrid,
        sampled: &Array2<f64>,
        seed: u64,
    ) -> Result<Array1<f64>> {
        let xt = sampled.slice(s![.., 0..1]);
        let yt = sampled.column(1);
        let model = self.builder.train(xt, yt, seed)?;

        let x = grid.values().view().insert_axis(Axis(1));
        let (_, variance) = model.predict_valvar(&x)?;
        let kernel = gaussian_window(self.config.kernel_len(), self.config.smoothing_sigma);
        Ok(convolve_same(&variance, &kernel))
    }

    fn grid_or_err(&self) -> Result<&CandidateGrid> {
        self.grid.as_ref().ok_or_else(|| {
            SelectError::PreconditionError(
                "feasible regions must be set before informing".to_string(),
            )
        })
    }
}

impl<B: UncertaintyBuilder> SamplingPointSelector for ActiveLearningSelector<B> {
    fn reset(&mut self, n_points: usize) -> Result<()> {
        if n_points == 0 {
            return Err(SelectError::PreconditionError(
                "number of sampling points should be strictly positive".to_string(),
            ));
        }
        info!("Reset active learning selector for {n_points} points");
        if let Some(seed) = self.config.seed {
            self.rng = Xoshiro256Plus::seed_from_u64(seed);
        }
        self.points_to_provide = n_points;
        self.current_index = 0;
        self.sampled_points = None;
        self.grid = None;
        self.sample_point_indices = vec![];
        self.decay = Decay::new(&self.config);
        Ok(())
    }

    fn set_initial_points(&mut self, inputs: &[f64], outputs: &[f64]) -> Result<()> {
        if self.points_to_provide == 0 {
            return Err(SelectError::PreconditionError(
                "reset must be called before setting initial points".to_string(),
            ));
        }
        if self.sampled_points.is_some() {
            return Err(SelectError::PreconditionError(
                "initial points are already set for this campaign".to_string(),
            ));
        }
        if inputs.len() < self.config.n_initial_points {
            return Err(SelectError::PreconditionError(format!(
                "The number of initial points must be at least {}, got {}",
                self.config.n_initial_points,
                inputs.len()
            )));
        }
        if inputs.len() != outputs.len() {
            return Err(SelectError::PreconditionError(format!(
                "{} inputs given for {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        info!("Set {} initial points", inputs.len());
        self.sampled_points = Some(stack![
            Axis(1),
            Array1::from(inputs.to_vec()),
            Array1::from(outputs.to_vec())
        ]);
        Ok(())
    }

    fn set_sampled_points(&mut self, _points: &[(f64, f64)]) -> Result<()> {
        Err(SelectError::NotImplementedError(
            "set_sampled_points on active learning selector",
        ))
    }

    fn inform(&mut self, input: f64, output: f64) -> Result<()> {
        let idx = self.grid_or_err()?.snap(input);
        if let Some(sampled) = self.sampled_points.as_mut() {
            *sampled = concatenate![Axis(0), sampled.view(), array![[input, output]]];
        }
        debug!("Inform f({input}) = {output} at grid index {idx}");
        self.sample_point_indices.push(idx);
        Ok(())
    }

    fn inform_failure(&mut self, input: f64) -> Result<()> {
        let idx = self.grid_or_err()?.snap(input);
        debug!("Inform invalid sampling at {input}, grid index {idx} excluded");
        self.sample_point_indices.push(idx);
        Ok(())
    }

    fn has_next_input(&mut self) -> bool {
        self.grid
            .as_ref()
            .is_some_and(|g| self.sample_point_indices.len() < g.len())
            && self.current_index < self.points_to_provide
    }

    fn get_next_input(&mut self) -> Result<f64> {
        if !self.has_next_input() {
            return Err(SelectError::PreconditionError(
                "no next input available (check has_next_input first)".to_string(),
            ));
        }
        let (Some(grid), Some(sampled)) = (self.grid.as_ref(), self.sampled_points.as_ref()) else {
            return Err(SelectError::PreconditionError(
                "feasible regions must be set before asking for inputs".to_string(),
            ));
        };

        let seed = self.rng.next_u64();
        let smoothed = self.smoothed_variance(grid, sampled, seed)?;

        let mut occupied = self.sample_point_indices.clone();
        occupied.sort_unstable();
        occupied.dedup();

        let chosen = loop {
            let min_dist = self
                .decay
                .min_index_distance(self.current_index, &self.config);
            let candidates = spaced_candidates(grid.feasible_indices(), &occupied, min_dist);
            debug!(
                "{} candidates at min index distance {}",
                candidates.len(),
                min_dist
            );
            if let Some(best) = argmax_among(&candidates, &smoothed) {
                break best;
            }
            if self.decay.is_exhausted(self.config.decay_floor) {
                warn!(
                    "No candidate left after {} points, selector exhausted",
                    self.current_index
                );
                return Err(SelectError::ExhaustedError);
            }
            self.decay.halve();
            debug!(
                "No candidate at distance {}, decay halved to stop={} min={}",
                min_dist, self.decay.stop_percentage, self.decay.min_percentage
            );
        };

        self.current_index += 1;
        let x = grid.value(chosen);
        info!(
            "Suggest point {}/{}: x = {} (grid index {})",
            self.current_index, self.points_to_provide, x, chosen
        );
        Ok(x)
    }
}
