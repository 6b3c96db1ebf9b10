//! This library implements sequential sampling point selectors: strategies
//! choosing, one at a time, where an expensive one-dimensional function should
//! be sampled next.
//!
//! Two selectors implement the [SamplingPointSelector] trait:
//! * [ActiveLearningSelector] trains an uncertainty model (by default a
//!   [regression forest](samplebox_forest)) on every known sample, smooths its
//!   predictive variance over a grid of candidates spanning the feasible regions
//!   and suggests the most uncertain candidate far enough from already sampled ones,
//! * [EquidistantSelector] walks a predetermined list of inputs, skipping the
//!   ones already sampled.
//!
//! # Example
//!
//! ```no_run
//! use samplebox_select::{ActiveLearningSelector, SamplingPointSelector, SelectorConfig};
//!
//! // A one-dimensional test function, x in [0., 25.]
//! fn xsinx(x: f64) -> f64 {
//!     (x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
//! }
//!
//! let mut selector = ActiveLearningSelector::new(SelectorConfig::default().seed(42))
//!     .expect("selector created");
//! selector.reset(20).expect("campaign started");
//!
//! let xt: Vec<f64> = (0..15).map(|i| 25. * i as f64 / 14.).collect();
//! let yt: Vec<f64> = xt.iter().map(|x| xsinx(*x)).collect();
//! selector.set_initial_points(&xt, &yt).expect("initial points");
//! selector.set_feasible_regions(&[0.], &[25.]).expect("feasible regions");
//!
//! while selector.has_next_input() {
//!     let x = selector.get_next_input().expect("next input");
//!     selector.inform(x, xsinx(x)).expect("sample recorded");
//! }
//! ```
//!
//! The selector is configured with [SelectorConfig], the grid resolution and
//! the spacing decay being the main knobs. Logs are emitted through the `log`
//! facade and displayed according to the `SAMPLEBOX_LOG` environment variable
//! (default `info`).
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod active_learning;
mod config;
mod equidistant;
mod errors;
mod selector;
mod surrogate;

pub mod grid;
pub mod smoothing;

pub use active_learning::*;
pub use config::*;
pub use equidistant::*;
pub use errors::*;
pub use selector::*;
pub use surrogate::*;
