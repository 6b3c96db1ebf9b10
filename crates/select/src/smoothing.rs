//! Gaussian smoothing of an uncertainty profile over the candidate grid.
use ndarray::{Array1, ArrayBase, Data, Ix1};

/// Gaussian window of `len` points with standard deviation `sigma` (in points),
/// centered and unnormalized so that its maximum is 1 when `len` is odd.
pub fn gaussian_window(len: usize, sigma: f64) -> Array1<f64> {
    let center = (len as f64 - 1.) / 2.;
    Array1::from_shape_fn(len, |i| {
        let n = i as f64 - center;
        (-n * n / (2. * sigma * sigma)).exp()
    })
}

/// Discrete linear convolution of `signal` and `kernel` keeping the central
/// part of the full convolution, of the length of the longest operand.
///
/// Samples near the borders only see the part of the kernel overlapping
/// the signal, as if the signal was zero padded.
pub fn convolve_same(
    signal: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    kernel: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Array1<f64> {
    let (a, v) = if kernel.len() > signal.len() {
        (kernel.view(), signal.view())
    } else {
        (signal.view(), kernel.view())
    };
    let (n, m) = (a.len(), v.len());
    if m == 0 {
        return Array1::zeros(n);
    }
    // out[i] = full[i + shift] with full[k] = sum_j a[j] * v[k - j]
    let shift = m - 1 - m / 2;
    Array1::from_shape_fn(n, |i| {
        let k = i + shift;
        let j_min = (k + 1).saturating_sub(m);
        let j_max = k.min(n - 1);
        (j_min..=j_max).map(|j| a[j] * v[k - j]).sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_gaussian_window() {
        let w = gaussian_window(21, 3.);
        assert_eq!(w.len(), 21);
        assert_abs_diff_eq!(w[10], 1.);
        assert_abs_diff_eq!(w[0], w[20]);
        assert_abs_diff_eq!(w[0], (-100. / 18f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(w[13], (-0.5f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_convolve_same_odd_kernel() {
        let signal = array![1., 2., 3., 4., 5.];
        let kernel = array![1., 1., 1.];
        assert_abs_diff_eq!(
            convolve_same(&signal, &kernel),
            array![3., 6., 9., 12., 9.]
        );
    }

    #[test]
    fn test_convolve_same_even_and_asymmetric_kernel() {
        let signal = array![1., 2., 3., 4.];
        let kernel = array![1., 0.5];
        assert_abs_diff_eq!(
            convolve_same(&signal, &kernel),
            array![1., 2.5, 4., 5.5]
        );
        let kernel = array![0., 1., 2.];
        assert_abs_diff_eq!(
            convolve_same(&signal, &kernel),
            array![1., 4., 7., 10.]
        );
    }

    #[test]
    fn test_convolve_same_longer_kernel() {
        let signal = array![1., 1.];
        let kernel = array![1., 2., 3.];
        assert_abs_diff_eq!(convolve_same(&signal, &kernel), array![1., 3., 5.]);
    }

    #[test]
    fn test_convolve_same_borders_see_truncated_kernel() {
        let signal = Array1::ones(100);
        let kernel = gaussian_window(21, 3.);
        let smoothed = convolve_same(&signal, &kernel);
        assert_eq!(smoothed.len(), 100);
        assert_abs_diff_eq!(smoothed[50], kernel.sum(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            smoothed[0],
            kernel.slice(ndarray::s![10..]).sum(),
            epsilon = 1e-12
        );
        assert!(smoothed[0] < smoothed[10]);
    }
}
