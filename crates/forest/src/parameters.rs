use crate::errors::{ForestError, Result};
use linfa::{Float, ParamGuard};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of trees in the ensemble
pub const FOREST_N_TREES: usize = 120;
/// Default maximum depth of a tree
pub const FOREST_MAX_DEPTH: usize = 9;
/// Default minimum number of samples in a leaf
pub const FOREST_MIN_SAMPLES_LEAF: usize = 6;
/// Default number of random thresholds tested per feature at each node
pub const FOREST_N_THRESHOLDS: usize = 3;
/// Default minimum entropy gain for a split to be kept
pub const FOREST_MIN_GAIN: f64 = 0.005;
/// Default number of worker threads used to grow the trees
pub const FOREST_N_THREADS: usize = 4;

/// How member predictions are summarized into the forest predictive variance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum SummaryMode {
    /// Average of the member variances
    #[default]
    AverageOfVariances,
    /// Variance of the single gaussian fitted to the mixture of member predictions
    MixtureVariance,
}

/// A set of validated forest parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize",
        deserialize = "F: Deserialize<'de>"
    ))
)]
pub struct ForestValidParams<F: Float> {
    /// Number of trees
    pub(crate) n_trees: usize,
    /// Maximum depth of a tree, the root being at depth 0
    pub(crate) max_depth: usize,
    /// A split leaving fewer samples on one side is rejected
    pub(crate) min_samples_leaf: usize,
    /// A node holding fewer samples becomes a leaf
    pub(crate) min_samples_split: usize,
    /// Number of random thresholds tested per feature
    pub(crate) n_thresholds: usize,
    /// Number of features drawn at each node
    pub(crate) n_features_per_node: usize,
    /// Minimum entropy gain to split a node
    pub(crate) min_gain: F,
    /// Variance summary mode
    pub(crate) summary: SummaryMode,
    /// Size of the worker pool used during training
    pub(crate) n_threads: usize,
    /// Random generator seed, drawn from entropy when None
    pub(crate) seed: Option<u64>,
}

impl<F: Float> Default for ForestValidParams<F> {
    fn default() -> ForestValidParams<F> {
        ForestValidParams {
            n_trees: FOREST_N_TREES,
            max_depth: FOREST_MAX_DEPTH,
            min_samples_leaf: FOREST_MIN_SAMPLES_LEAF,
            min_samples_split: 2 * FOREST_MIN_SAMPLES_LEAF,
            n_thresholds: FOREST_N_THRESHOLDS,
            n_features_per_node: 1,
            min_gain: F::cast(FOREST_MIN_GAIN),
            summary: SummaryMode::default(),
            n_threads: FOREST_N_THREADS,
            seed: None,
        }
    }
}

impl<F: Float> ForestValidParams<F> {
    /// Get the number of trees
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Get the maximum tree depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Get the minimum number of samples per leaf
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Get the minimum number of samples required to split a node
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Get the number of thresholds tested per feature
    pub fn n_thresholds(&self) -> usize {
        self.n_thresholds
    }

    /// Get the number of features tested per node
    pub fn n_features_per_node(&self) -> usize {
        self.n_features_per_node
    }

    /// Get the minimum gain to split
    pub fn min_gain(&self) -> F {
        self.min_gain
    }

    /// Get the variance summary mode
    pub fn summary(&self) -> SummaryMode {
        self.summary
    }

    /// Get the number of training threads
    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Get the random seed if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[derive(Clone, Debug, Default)]
/// The set of hyperparameters that can be specified for the execution of
/// the [forest algorithm](struct.RegressionForest.html).
pub struct ForestParams<F: Float>(ForestValidParams<F>);

impl<F: Float> ForestParams<F> {
    /// A constructor for forest parameters with default values
    pub fn new() -> ForestParams<F> {
        Self(ForestValidParams::default())
    }

    /// A constructor for forest parameters from validated parameters
    pub fn new_from_valid(params: &ForestValidParams<F>) -> Self {
        Self(params.clone())
    }

    /// Set the number of trees.
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.0.n_trees = n_trees;
        self
    }

    /// Set the maximum depth of the trees.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples of a leaf.
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.0.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the minimum number of samples a node must hold to be split.
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }

    /// Set the number of random thresholds tested per feature.
    pub fn n_thresholds(mut self, n_thresholds: usize) -> Self {
        self.0.n_thresholds = n_thresholds;
        self
    }

    /// Set the number of features drawn at each node.
    pub fn n_features_per_node(mut self, n_features_per_node: usize) -> Self {
        self.0.n_features_per_node = n_features_per_node;
        self
    }

    /// Set the minimum entropy gain required to split a node.
    pub fn min_gain(mut self, min_gain: F) -> Self {
        self.0.min_gain = min_gain;
        self
    }

    /// Set the way member variances are summarized.
    pub fn summary(mut self, summary: SummaryMode) -> Self {
        self.0.summary = summary;
        self
    }

    /// Set the number of worker threads used to grow the trees.
    pub fn n_threads(mut self, n_threads: usize) -> Self {
        self.0.n_threads = n_threads;
        self
    }

    /// Set the random generator seed for reproducibility.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float> From<ForestValidParams<F>> for ForestParams<F> {
    fn from(valid: ForestValidParams<F>) -> Self {
        ForestParams(valid)
    }
}

impl<F: Float> ParamGuard for ForestParams<F> {
    type Checked = ForestValidParams<F>;
    type Error = ForestError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let p = &self.0;
        let positive = [
            ("n_trees", p.n_trees),
            ("max_depth", p.max_depth),
            ("min_samples_leaf", p.min_samples_leaf),
            ("n_thresholds", p.n_thresholds),
            ("n_features_per_node", p.n_features_per_node),
            ("n_threads", p.n_threads),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(ForestError::InvalidValueError(format!(
                "`{name}` should be strictly positive"
            )));
        }
        if p.min_samples_split < 2 {
            return Err(ForestError::InvalidValueError(format!(
                "`min_samples_split` should be at least 2, got {}",
                p.min_samples_split
            )));
        }
        if p.min_gain.is_nan() || p.min_gain < F::zero() {
            return Err(ForestError::InvalidValueError(format!(
                "`min_gain` should be non negative, got {}",
                p.min_gain
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
