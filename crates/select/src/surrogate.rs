//! Uncertainty models used by the active learning selector.
use crate::errors::Result;

use linfa::ParamGuard;
use linfa::prelude::{Dataset, Fit};
use ndarray::{Array1, ArrayView1, ArrayView2};
use samplebox_forest::{ForestParams, RegressionForest};

/// A model trained on (x, y) samples able to predict a mean and a variance
pub trait UncertaintyModel {
    /// Predict mean and variance at n given `x` points specified as a (n, nx) matrix
    fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)>;
}

/// A trainer of [UncertaintyModel]
pub trait UncertaintyBuilder {
    /// Train the model with given training dataset (x, y), `seed` seeding any
    /// random choice made during training
    fn train(
        &self,
        xt: ArrayView2<f64>,
        yt: ArrayView1<f64>,
        seed: u64,
    ) -> Result<Box<dyn UncertaintyModel>>;
}

impl UncertaintyModel for RegressionForest<f64> {
    fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        Ok(RegressionForest::predict_valvar(self, x)?)
    }
}

/// Builder of [RegressionForest] uncertainty models
#[derive(Clone, Debug, Default)]
pub struct ForestBuilder {
    params: ForestParams<f64>,
}

impl ForestBuilder {
    /// Constructor given forest hyperparameters
    pub fn new(params: ForestParams<f64>) -> Self {
        ForestBuilder { params }
    }

    /// Forest hyperparameters
    pub fn params(&self) -> &ForestParams<f64> {
        &self.params
    }
}

impl UncertaintyBuilder for ForestBuilder {
    fn train(
        &self,
        xt: ArrayView2<f64>,
        yt: ArrayView1<f64>,
        seed: u64,
    ) -> Result<Box<dyn UncertaintyModel>> {
        let dataset = Dataset::new(xt.to_owned(), yt.to_owned());
        let params = self.params.clone().seed(Some(seed)).check()?;
        let forest = params.fit(&dataset)?;
        Ok(Box::new(forest))
    }
}
