//! This library implements a regression forest predicting for each input point
//! both an output value and a variance, the latter being used as an uncertainty
//! estimate by sequential sampling strategies.
//!
//! The forest is an ensemble of randomized trees: at each node a few thresholds
//! are drawn at random within the range of the node samples and the split
//! maximizing the gaussian entropy gain is retained. Leaves summarize their
//! training targets by a mean and a variance.
//!
//! Forest methods are implemented by [RegressionForest] parameterized by [ForestParams].
//!
//! ```
//! use samplebox_forest::RegressionForest;
//! use linfa::prelude::*;
//! use ndarray::{Array, Axis, array};
//!
//! let xt = Array::linspace(0f64, 10., 50).insert_axis(Axis(1));
//! let yt = xt.column(0).mapv(|v| v.sin());
//!
//! let forest = RegressionForest::params()
//!     .n_trees(20)
//!     .seed(Some(42))
//!     .fit(&Dataset::new(xt, yt))
//!     .expect("Forest fitted");
//!
//! let (mean, variance) = forest
//!     .predict_valvar(&array![[2.5], [7.5]])
//!     .expect("Forest prediction");
//! assert_eq!(mean.len(), 2);
//! assert!(variance.iter().all(|v| *v >= 0.));
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
mod errors;
mod parameters;
mod tree;

pub use algorithm::*;
pub use errors::*;
pub use parameters::*;
pub use tree::{Leaf, RegressionTree};
