//! Candidate grid discretizing the sampling domain.
use crate::errors::{Result, SelectError};

use ndarray::{Array1, ArrayBase, Data, Ix1};
use ndarray_stats::QuantileExt;

/// Returns `n` evenly spaced values over `[lower, upper]`.
///
/// The last value is exactly `upper` whatever the rounding of the step.
pub fn linspace(lower: f64, upper: f64, n: usize) -> Array1<f64> {
    let mut values = Array1::linspace(lower, upper, n);
    if let Some(last) = values.last_mut() {
        *last = upper;
    }
    values
}

/// Index of the first value of the sorted `grid` which is not less than `value`
fn lower_bound(grid: &ArrayBase<impl Data<Elem = f64>, Ix1>, value: f64) -> usize {
    let (mut lo, mut hi) = (0, grid.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if grid[mid] < value {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Index of the value of the sorted `grid` nearest to `value`.
///
/// Ties are resolved to the lowest index, as would a linear scan keeping
/// the first minimum of `|grid - value|`. Non finite values snap to 0.
/// `grid` must not be empty.
pub fn nearest_index(grid: &ArrayBase<impl Data<Elem = f64>, Ix1>, value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let n = grid.len();
    let upper = lower_bound(grid, value);
    let nearest = if upper == 0 {
        0
    } else if upper == n || value - grid[upper - 1] <= grid[upper] - value {
        upper - 1
    } else {
        upper
    };
    // repeated grid values: keep the first one
    lower_bound(grid, grid[nearest])
}

/// The sampling domain discretization: evenly spaced candidates spanning the
/// feasible regions bounds together with the candidates lying in at least
/// one feasible region.
#[derive(Clone, Debug)]
pub struct CandidateGrid {
    values: Array1<f64>,
    feasible: Array1<bool>,
    feasible_indices: Vec<usize>,
}

impl CandidateGrid {
    /// Build a grid of `resolution` points spanning `[min(lowers), max(uppers)]`
    /// given feasible regions as closed intervals `[lowers[i], uppers[i]]`.
    pub fn new(lowers: &[f64], uppers: &[f64], resolution: usize) -> Result<Self> {
        if lowers.len() != uppers.len() {
            return Err(SelectError::PreconditionError(format!(
                "feasible region bounds should have the same length, got {} lowers and {} uppers",
                lowers.len(),
                uppers.len()
            )));
        }
        if lowers.is_empty() {
            return Err(SelectError::PreconditionError(
                "at least one feasible region is required".to_string(),
            ));
        }
        if let Some((lower, upper)) = lowers
            .iter()
            .zip(uppers)
            .find(|(lower, upper)| !(lower <= upper))
        {
            return Err(SelectError::PreconditionError(format!(
                "feasible region [{lower}, {upper}] should have lower <= upper"
            )));
        }

        let bounds: Array1<f64> = lowers.iter().chain(uppers).copied().collect();
        let (min, max) = match (bounds.min(), bounds.max()) {
            (Ok(min), Ok(max)) => (*min, *max),
            _ => {
                return Err(SelectError::PreconditionError(
                    "feasible region bounds should be comparable".to_string(),
                ));
            }
        };
        let values = linspace(min, max, resolution);
        let feasible = values.mapv(|v| {
            lowers
                .iter()
                .zip(uppers)
                .any(|(lower, upper)| *lower <= v && v <= *upper)
        });
        let feasible_indices = feasible
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.then_some(i))
            .collect();

        Ok(CandidateGrid {
            values,
            feasible,
            feasible_indices,
        })
    }

    /// Candidate values
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid has no candidate
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the ith candidate
    pub fn value(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Whether the ith candidate lies in a feasible region
    pub fn is_feasible(&self, i: usize) -> bool {
        self.feasible[i]
    }

    /// Indices of the feasible candidates in increasing order
    pub fn feasible_indices(&self) -> &[usize] {
        &self.feasible_indices
    }

    /// Index of the candidate nearest to `value`
    pub fn snap(&self, value: f64) -> usize {
        nearest_index(&self.values, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_linspace() {
        let values = linspace(0., 1., 5);
        assert_abs_diff_eq!(values, array![0., 0.25, 0.5, 0.75, 1.]);
        let values = linspace(0.1, 0.7, 1000);
        assert_eq!(values[999], 0.7);
        assert_eq!(values[0], 0.1);
    }

    #[test]
    fn test_nearest_index() {
        let grid = array![0., 1., 2., 3.];
        assert_eq!(nearest_index(&grid, -5.), 0);
        assert_eq!(nearest_index(&grid, 0.2), 0);
        assert_eq!(nearest_index(&grid, 0.5), 0);
        assert_eq!(nearest_index(&grid, 0.51), 1);
        assert_eq!(nearest_index(&grid, 2.), 2);
        assert_eq!(nearest_index(&grid, 2.5), 2);
        assert_eq!(nearest_index(&grid, 10.), 3);
        assert_eq!(nearest_index(&grid, f64::NAN), 0);
    }

    #[test]
    fn test_nearest_index_matches_linear_scan() {
        let grid = linspace(-3., 7., 1000);
        for k in 0..5000 {
            let value = -4. + 12. * (k as f64) / 4999.;
            let scan = grid
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |(best, dist), (i, g)| {
                    let d = (g - value).abs();
                    if d < dist { (i, d) } else { (best, dist) }
                })
                .0;
            assert_eq!(nearest_index(&grid, value), scan, "value {value}");
        }
    }

    #[test]
    fn test_nearest_index_repeated_values() {
        let grid = linspace(2., 2., 10);
        assert_eq!(nearest_index(&grid, 2.), 0);
        assert_eq!(nearest_index(&grid, 5.), 0);
        assert_eq!(nearest_index(&grid, -1.), 0);
    }

    #[test]
    fn test_grid_feasibility() {
        let grid = CandidateGrid::new(&[1., 7.], &[4., 10.], 10).unwrap();
        assert_eq!(grid.len(), 10);
        assert_eq!(grid.value(0), 1.);
        assert_eq!(grid.value(9), 10.);
        // values are 1, 2, ..., 10
        assert_eq!(grid.feasible_indices(), &[0, 1, 2, 3, 6, 7, 8, 9]);
        assert!(!grid.is_feasible(4));
        assert_eq!(grid.snap(5.4), 4);
    }

    #[test]
    fn test_grid_overlapping_regions() {
        let grid = CandidateGrid::new(&[0., 2.], &[3., 4.], 5).unwrap();
        assert_eq!(grid.feasible_indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_grid_invalid_regions() {
        assert!(CandidateGrid::new(&[1.], &[0.], 10).is_err());
        assert!(CandidateGrid::new(&[1., 2.], &[3.], 10).is_err());
        assert!(CandidateGrid::new(&[], &[], 10).is_err());
        assert!(CandidateGrid::new(&[f64::NAN], &[1.], 10).is_err());
    }
}
