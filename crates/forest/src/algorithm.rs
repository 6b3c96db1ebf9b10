use crate::errors::{ForestError, Result};
use crate::parameters::{ForestParams, ForestValidParams, SummaryMode};
use crate::tree::RegressionTree;

use linfa::prelude::{DatasetBase, Fit, Float, PredictInplace};
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2, Zip};
use ndarray_rand::rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use log::debug;
use rayon::prelude::*;
use std::fmt;
use std::time::Instant;

/// A regression forest is an ensemble of randomized regression trees
/// where each leaf summarizes its training targets by a gaussian.
///
/// The prediction at x is the average of the member means while the
/// predictive variance aggregates member (mean, variance) pairs according
/// to the [`SummaryMode`]:
///
/// * `AverageOfVariances`: `var(x) = 1/T sum_t var_t(x)`
/// * `MixtureVariance`: `var(x) = 1/T sum_t (var_t(x) + mu_t(x)^2) - mu(x)^2`
///
/// Hence the predictive variance is high where members disagree or where
/// leaves gather heterogeneous targets, which makes it usable as an
/// uncertainty estimate for sequential sampling.
#[derive(Clone, Debug)]
pub struct RegressionForest<F: Float> {
    /// Ensemble members
    trees: Vec<RegressionTree<F>>,
    /// Number of input components
    nx: usize,
    /// Parameters used to fit this model
    params: ForestValidParams<F>,
}

impl<F: Float> fmt::Display for RegressionForest<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RegressionForest(n_trees={}, max_depth={}, summary={:?})",
            self.trees.len(),
            self.params.max_depth(),
            self.params.summary(),
        )
    }
}

impl<F: Float> RegressionForest<F> {
    /// Forest parameters constructor
    pub fn params() -> ForestParams<F> {
        ForestParams::new()
    }

    /// Ensemble members
    pub fn trees(&self) -> &[RegressionTree<F>] {
        &self.trees
    }

    /// Parameters used to fit the forest
    pub fn parameters(&self) -> &ForestValidParams<F> {
        &self.params
    }

    /// Predict output values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n scalar output values as a vector (n,).
    pub fn predict(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        Ok(self.predict_valvar(x)?.0)
    }

    /// Predict variance values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n variance values as (n,) column vector.
    pub fn predict_var(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        Ok(self.predict_valvar(x)?.1)
    }

    /// Predict both output values and variance at n given `x` points of nx components
    pub fn predict_valvar(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array1<F>, Array1<F>)> {
        if x.ncols() != self.nx {
            return Err(ForestError::DimensionMismatchError {
                expected: self.nx,
                actual: x.ncols(),
            });
        }
        let n_trees = F::cast(self.trees.len());
        let mut values = Array1::zeros(x.nrows());
        let mut variances = Array1::zeros(x.nrows());
        Zip::from(x.rows())
            .and(&mut values)
            .and(&mut variances)
            .par_for_each(|xi, value, variance| {
                let (sum_mean, sum_var, sum_sq_mean) = self.trees.iter().fold(
                    (F::zero(), F::zero(), F::zero()),
                    |(m, v, s), tree| {
                        let leaf = tree.leaf(&xi);
                        (m + leaf.mean, v + leaf.variance, s + leaf.mean * leaf.mean)
                    },
                );
                let mean = sum_mean / n_trees;
                *value = mean;
                *variance = match self.params.summary() {
                    SummaryMode::AverageOfVariances => sum_var / n_trees,
                    SummaryMode::MixtureVariance => {
                        let var = (sum_var + sum_sq_mean) / n_trees - mean * mean;
                        if var < F::zero() { F::zero() } else { var }
                    }
                };
            });
        Ok((values, variances))
    }
}

impl<F, D> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for RegressionForest<F>
where
    F: Float,
    D: Data<Elem = F>,
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let values = self.predict(x).expect("Forest prediction");
        *y = values;
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros((x.nrows(),))
    }
}

impl<F: Float, D: Data<Elem = F>> Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, ForestError>
    for ForestValidParams<F>
{
    type Object = RegressionForest<F>;

    /// Grow the trees of the forest in parallel, each one on the full dataset
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>,
    ) -> Result<Self::Object> {
        let x = dataset.records().view();
        let y = dataset.targets().view();

        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ForestError::EmptyDatasetError);
        }
        if x.nrows() != y.len() {
            return Err(ForestError::InvalidValueError(format!(
                "Number of training inputs ({}) and outputs ({}) should match",
                x.nrows(),
                y.len()
            )));
        }

        let mut rng = match self.seed() {
            Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
            None => Xoshiro256Plus::from_entropy(),
        };
        // one generator per tree so that results do not depend on scheduling
        let seeds: Vec<u64> = (0..self.n_trees()).map(|_| rng.next_u64()).collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_threads())
            .build()?;
        let now = Instant::now();
        let trees = pool.install(|| {
            seeds
                .par_iter()
                .map(|&seed| {
                    let mut tree_rng = Xoshiro256Plus::seed_from_u64(seed);
                    RegressionTree::grow(&x, &y, self, &mut tree_rng)
                })
                .collect::<Vec<_>>()
        });
        debug!(
            "Forest of {} trees fitted on {} points in {:?}",
            trees.len(),
            x.nrows(),
            now.elapsed()
        );

        Ok(RegressionForest {
            trees,
            nx: x.ncols(),
            params: self.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linfa::{Dataset, ParamGuard};
    use ndarray::{Array, Array2, Axis, Ix1, array};

    fn xsinx_dataset(n: usize) -> Dataset<f64, f64, Ix1> {
        let xt: Array2<f64> = Array::linspace(0., 25., n).insert_axis(Axis(1));
        let yt = xt
            .column(0)
            .mapv(|v| (v - 3.5) * ((v - 3.5) / std::f64::consts::PI).sin());
        Dataset::new(xt, yt)
    }

    #[test]
    fn test_forest_fit_predict() {
        let forest = RegressionForest::params()
            .seed(Some(42))
            .fit(&xsinx_dataset(60))
            .expect("Forest fitted");
        assert_eq!(forest.trees().len(), 120);

        let xtest = array![[0.], [12.5], [25.]];
        let (values, variances) = forest.predict_valvar(&xtest).expect("Prediction");
        assert_eq!(values.len(), 3);
        assert!(variances.iter().all(|v| *v >= 0.));
        assert_abs_diff_eq!(values, forest.predict(&xtest).unwrap());
        assert_abs_diff_eq!(variances, forest.predict_var(&xtest).unwrap());
    }

    #[test]
    fn test_forest_is_reproducible_with_seed() {
        let ds = xsinx_dataset(40);
        let params = RegressionForest::params().seed(Some(7)).n_trees(16);
        let xtest = Array::linspace(0., 25., 50).insert_axis(Axis(1));
        let (m1, v1) = params.fit(&ds).unwrap().predict_valvar(&xtest).unwrap();
        let (m2, v2) = params
            .n_threads(1)
            .fit(&ds)
            .unwrap()
            .predict_valvar(&xtest)
            .unwrap();
        assert_eq!(m1, m2);
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_mixture_variance_is_not_smaller() {
        let ds = xsinx_dataset(40);
        let xtest = Array::linspace(0., 25., 30).insert_axis(Axis(1));
        let average = RegressionForest::params()
            .seed(Some(3))
            .n_trees(10)
            .fit(&ds)
            .unwrap()
            .predict_var(&xtest)
            .unwrap();
        let mixture = RegressionForest::params()
            .seed(Some(3))
            .n_trees(10)
            .summary(SummaryMode::MixtureVariance)
            .fit(&ds)
            .unwrap()
            .predict_var(&xtest)
            .unwrap();
        Zip::from(&average)
            .and(&mixture)
            .for_each(|a, m| assert!(*m >= *a - 1e-9));
    }

    #[test]
    fn test_forest_predict_inplace() {
        use linfa::traits::Predict;
        let forest = RegressionForest::params()
            .seed(Some(1))
            .n_trees(5)
            .fit(&xsinx_dataset(30))
            .unwrap();
        let xtest = array![[1.], [2.]];
        let y: Array1<f64> = forest.predict(&xtest).unwrap();
        let y_linfa: Array1<f64> = Predict::predict(&forest, &xtest);
        assert_abs_diff_eq!(y, y_linfa);
    }

    #[test]
    fn test_forest_errors() {
        let empty = Dataset::new(Array2::<f64>::zeros((0, 1)), Array1::<f64>::zeros(0));
        assert!(matches!(
            RegressionForest::params().fit(&empty),
            Err(ForestError::EmptyDatasetError)
        ));

        let forest = RegressionForest::params()
            .n_trees(2)
            .fit(&xsinx_dataset(20))
            .unwrap();
        assert!(matches!(
            forest.predict_valvar(&array![[1., 2.]]),
            Err(ForestError::DimensionMismatchError {
                expected: 1,
                actual: 2
            })
        ));
        assert!(
            RegressionForest::<f64>::params()
                .n_trees(0)
                .check()
                .is_err()
        );
    }
}
