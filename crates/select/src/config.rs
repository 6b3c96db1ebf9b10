//! Active learning selector configuration.
use crate::errors::{Result, SelectError};

use serde::{Deserialize, Serialize};

/// Number of candidate points of the sampling grid
pub const GRID_RESOLUTION: usize = 1000;
/// Minimal number of initial samples
pub const N_INITIAL_POINTS: usize = 15;
/// Expected number of samples at the end of a campaign
pub const N_FINAL_POINTS: usize = 200;
/// Initial fraction of the campaign over which the spacing constraint vanishes
pub const STOP_PERCENTAGE: f64 = 0.63912041;
/// Initial floor of the spacing decay
pub const MIN_PERCENTAGE: f64 = 0.001;
/// Spacing, in grid cells, enforced at the start of a campaign
pub const DISTANCE_FACTOR: f64 = 10.58386027;
/// Decay parameters value under which the selector gives up
pub const DECAY_FLOOR: f64 = 0.0001;
/// Standard deviation, in grid cells, of the variance smoothing kernel
pub const SMOOTHING_SIGMA: f64 = 3.;
/// Width of the smoothing kernel as a multiple of its standard deviation
pub const SMOOTHING_WIDTH_FACTOR: f64 = 7.;

/// Active learning selector configuration
///
/// Changing the grid resolution changes the meaning of every distance
/// expressed in grid cells (spacing, smoothing), hence the selector behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Number of points of the candidate grid
    pub(crate) grid_resolution: usize,
    /// Minimal number of points given to `set_initial_points`
    pub(crate) n_initial_points: usize,
    /// Expected campaign size used to scale the spacing decay
    pub(crate) n_final_points: usize,
    /// Initial value of the stop percentage decay parameter
    pub(crate) stop_percentage: f64,
    /// Initial value of the min percentage decay parameter
    pub(crate) min_percentage: f64,
    /// Spacing scale in grid cells
    pub(crate) distance_factor: f64,
    /// Both decay parameters below this value means exhaustion
    pub(crate) decay_floor: f64,
    /// Gaussian smoothing standard deviation in grid cells
    pub(crate) smoothing_sigma: f64,
    /// Gaussian kernel length is `round(smoothing_width_factor * smoothing_sigma)`
    pub(crate) smoothing_width_factor: f64,
    /// A random generator seed used to get reproductible results.
    pub(crate) seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            grid_resolution: GRID_RESOLUTION,
            n_initial_points: N_INITIAL_POINTS,
            n_final_points: N_FINAL_POINTS,
            stop_percentage: STOP_PERCENTAGE,
            min_percentage: MIN_PERCENTAGE,
            distance_factor: DISTANCE_FACTOR,
            decay_floor: DECAY_FLOOR,
            smoothing_sigma: SMOOTHING_SIGMA,
            smoothing_width_factor: SMOOTHING_WIDTH_FACTOR,
            seed: None,
        }
    }
}

impl SelectorConfig {
    /// Sets the number of candidate grid points
    pub fn grid_resolution(mut self, grid_resolution: usize) -> Self {
        self.grid_resolution = grid_resolution;
        self
    }

    /// Sets the minimal number of initial points
    pub fn n_initial_points(mut self, n_initial_points: usize) -> Self {
        self.n_initial_points = n_initial_points;
        self
    }

    /// Sets the expected number of points at the end of the campaign
    pub fn n_final_points(mut self, n_final_points: usize) -> Self {
        self.n_final_points = n_final_points;
        self
    }

    /// Sets the initial stop percentage
    pub fn stop_percentage(mut self, stop_percentage: f64) -> Self {
        self.stop_percentage = stop_percentage;
        self
    }

    /// Sets the initial min percentage
    pub fn min_percentage(mut self, min_percentage: f64) -> Self {
        self.min_percentage = min_percentage;
        self
    }

    /// Sets the spacing scale expressed in grid cells
    pub fn distance_factor(mut self, distance_factor: f64) -> Self {
        self.distance_factor = distance_factor;
        self
    }

    /// Sets the decay value under which no more point can be found
    pub fn decay_floor(mut self, decay_floor: f64) -> Self {
        self.decay_floor = decay_floor;
        self
    }

    /// Sets the smoothing kernel standard deviation (grid cells)
    pub fn smoothing_sigma(mut self, smoothing_sigma: f64) -> Self {
        self.smoothing_sigma = smoothing_sigma;
        self
    }

    /// Sets the smoothing kernel width factor
    pub fn smoothing_width_factor(mut self, smoothing_width_factor: f64) -> Self {
        self.smoothing_width_factor = smoothing_width_factor;
        self
    }

    /// Allow to specify a seed for random number generator to allow
    /// reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of candidate grid points
    pub fn get_grid_resolution(&self) -> usize {
        self.grid_resolution
    }

    /// Minimal number of initial points
    pub fn get_n_initial_points(&self) -> usize {
        self.n_initial_points
    }

    /// Expected number of points at the end of the campaign
    pub fn get_n_final_points(&self) -> usize {
        self.n_final_points
    }

    /// Initial stop percentage
    pub fn get_stop_percentage(&self) -> f64 {
        self.stop_percentage
    }

    /// Initial min percentage
    pub fn get_min_percentage(&self) -> f64 {
        self.min_percentage
    }

    /// Spacing scale in grid cells
    pub fn get_distance_factor(&self) -> f64 {
        self.distance_factor
    }

    /// Decay value under which no more point can be found
    pub fn get_decay_floor(&self) -> f64 {
        self.decay_floor
    }

    /// Smoothing kernel standard deviation (grid cells)
    pub fn get_smoothing_sigma(&self) -> f64 {
        self.smoothing_sigma
    }

    /// Smoothing kernel width factor
    pub fn get_smoothing_width_factor(&self) -> f64 {
        self.smoothing_width_factor
    }

    /// Random seed if any
    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Length of the smoothing kernel
    pub fn kernel_len(&self) -> usize {
        (self.smoothing_width_factor * self.smoothing_sigma).round() as usize
    }

    /// Check configuration consistency
    pub fn check(self) -> Result<Self> {
        if self.grid_resolution < 2 {
            return Err(SelectError::InvalidConfigError(format!(
                "grid resolution should be at least 2, got {}",
                self.grid_resolution
            )));
        }
        if self.n_final_points <= self.n_initial_points {
            return Err(SelectError::InvalidConfigError(format!(
                "final number of points ({}) should be greater than initial one ({})",
                self.n_final_points, self.n_initial_points
            )));
        }
        let positive = [
            ("stop_percentage", self.stop_percentage),
            ("min_percentage", self.min_percentage),
            ("distance_factor", self.distance_factor),
            ("decay_floor", self.decay_floor),
            ("smoothing_sigma", self.smoothing_sigma),
            ("smoothing_width_factor", self.smoothing_width_factor),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0. && v.is_finite())) {
            return Err(SelectError::InvalidConfigError(format!(
                "{name} should be strictly positive, got {value}"
            )));
        }
        if self.kernel_len() == 0 {
            return Err(SelectError::InvalidConfigError(
                "smoothing kernel should have at least one point".to_string(),
            ));
        }
        Ok(self)
    }
}
