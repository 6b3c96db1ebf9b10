//! Equidistant sampling point selection: a predetermined list of inputs is
//! walked in order, skipping inputs already sampled.
use crate::errors::{Result, SelectError};
use crate::selector::SamplingPointSelector;

use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis, array, concatenate, stack};

/// Selector walking a fixed ordered list of candidate inputs
#[derive(Clone, Debug)]
pub struct EquidistantSelector {
    complete_points: Option<Array1<f64>>,
    /// Known samples as a (n, 2) matrix of [input, output] rows
    sampled_points: Array2<f64>,
    cursor: usize,
}

impl EquidistantSelector {
    /// Constructor of a selector without candidates nor samples
    pub fn new() -> Self {
        EquidistantSelector {
            complete_points: None,
            sampled_points: Array2::zeros((0, 2)),
            cursor: 0,
        }
    }

    /// Sets the ordered candidate inputs
    pub fn set_complete_points(&mut self, points: &[f64]) {
        self.complete_points = Some(Array1::from(points.to_vec()));
    }

    /// Ordered candidate inputs
    pub fn complete_points(&self) -> Option<&Array1<f64>> {
        self.complete_points.as_ref()
    }

    /// Known samples
    pub fn sampled_points(&self) -> ArrayView2<'_, f64> {
        self.sampled_points.view()
    }

    /// Position of the next candidate
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_sampled(&self, input: f64) -> bool {
        self.sampled_points.column(0).iter().any(|x| *x == input)
    }
}

impl Default for EquidistantSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingPointSelector for EquidistantSelector {
    /// Rewinds to the first candidate, `n_points` is ignored.
    fn reset(&mut self, _n_points: usize) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn set_initial_points(&mut self, inputs: &[f64], outputs: &[f64]) -> Result<()> {
        if inputs.len() != outputs.len() {
            return Err(SelectError::PreconditionError(format!(
                "{} inputs given for {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        self.sampled_points = stack![
            Axis(1),
            Array1::from(inputs.to_vec()),
            Array1::from(outputs.to_vec())
        ];
        Ok(())
    }

    fn set_sampled_points(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.sampled_points = Array2::from_shape_fn((points.len(), 2), |(i, j)| {
            if j == 0 { points[i].0 } else { points[i].1 }
        });
        Ok(())
    }

    fn inform(&mut self, input: f64, output: f64) -> Result<()> {
        self.sampled_points = concatenate![
            Axis(0),
            self.sampled_points.view(),
            array![[input, output]]
        ];
        Ok(())
    }

    fn inform_failure(&mut self, _input: f64) -> Result<()> {
        Ok(())
    }

    fn has_next_input(&mut self) -> bool {
        let Some(complete) = self.complete_points.as_ref() else {
            return false;
        };
        while self.cursor < complete.len() && self.is_sampled(complete[self.cursor]) {
            debug!("Skip already sampled input {}", complete[self.cursor]);
            self.cursor += 1;
        }
        self.cursor < complete.len()
    }

    fn get_next_input(&mut self) -> Result<f64> {
        let next = self
            .complete_points
            .as_ref()
            .and_then(|complete| complete.get(self.cursor).copied())
            .ok_or_else(|| {
                SelectError::PreconditionError("no more candidate input".to_string())
            })?;
        self.cursor += 1;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(selector: &mut EquidistantSelector) -> Vec<f64> {
        let mut inputs = vec![];
        while selector.has_next_input() {
            inputs.push(selector.get_next_input().unwrap());
        }
        inputs
    }

    #[test]
    fn test_skips_sampled_inputs() {
        let mut selector = EquidistantSelector::new();
        selector
            .set_sampled_points(&[(1., 5.), (3., 7.), (6., 10.)])
            .unwrap();
        selector.set_complete_points(&[1., 2., 4., 7.]);
        assert_eq!(drain(&mut selector), vec![2., 4., 7.]);
        assert!(selector.get_next_input().is_err());
    }

    #[test]
    fn test_initial_points_and_inform() {
        let mut selector = EquidistantSelector::new();
        selector.set_complete_points(&[1., 2., 4., 7.]);
        selector
            .set_initial_points(&[1., 3., 6.], &[5., 7., 10.])
            .unwrap();
        selector.inform(7., 11.).unwrap();
        assert_eq!(selector.sampled_points().nrows(), 4);
        assert_eq!(selector.sampled_points().row(3).to_vec(), vec![7., 11.]);
        assert_eq!(drain(&mut selector), vec![2., 4.]);
        assert!(selector.set_initial_points(&[1.], &[]).is_err());
    }

    #[test]
    fn test_reset_rewinds_cursor_only() {
        let mut selector = EquidistantSelector::new();
        selector.set_complete_points(&[1., 2., 3.]);
        assert_eq!(drain(&mut selector), vec![1., 2., 3.]);
        selector.inform(2., 0.).unwrap();
        selector.inform_failure(3.).unwrap();
        selector.reset(100).unwrap();
        assert_eq!(selector.cursor(), 0);
        assert_eq!(drain(&mut selector), vec![1., 3.]);
    }

    #[test]
    fn test_without_complete_points() {
        let mut selector = EquidistantSelector::new();
        assert!(!selector.has_next_input());
        assert!(selector.get_next_input().is_err());
    }
}
