//! Small numerical helpers shared by the pulse generators.

use ndarray::{Array1, ArrayView1};

/// Unnormalised Gaussian $\exp\!\left(-\tfrac12\left(\frac{x - x_0}{\sigma}\right)^2\right)$.
///
/// The peak value is exactly 1 at `x == x0`; `sigma` is the standard-deviation
/// width.
pub fn gaussian(x: f64, x0: f64, sigma: f64) -> f64 {
    let u = (x - x0) / sigma;
    (-0.5 * u * u).exp()
}

/// [`gaussian`] evaluated over every sample of `x`.
pub fn gaussian_array(x: ArrayView1<f64>, x0: f64, sigma: f64) -> Array1<f64> {
    x.mapv(|xi| gaussian(xi, x0, sigma))
}

/// Mean of `x` weighted by the non-negative distribution `y`.
///
/// Returns `None` if the lengths differ or the distribution has no weight.
pub fn weighted_mean(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    let norm = y.sum();
    if norm <= 0.0 || !norm.is_finite() {
        return None;
    }
    Some(x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum::<f64>() / norm)
}

/// Root-mean-square (second central moment) width of the distribution `y`
/// sampled at `x`.
///
/// For `y = |gaussian(x, x0, σ)|²` this returns `σ/√2`.
pub fn rms_width(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<f64> {
    let mean = weighted_mean(x, y)?;
    let norm = y.sum();
    let var = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - mean).powi(2) * yi)
        .sum::<f64>()
        / norm;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_peak_and_one_sigma() {
        assert_eq!(gaussian(3.0, 3.0, 2.0), 1.0);
        assert_relative_eq!(gaussian(5.0, 3.0, 2.0), (-0.5_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_rms_width_of_sampled_gaussian() {
        let x = Array1::linspace(-20.0, 20.0, 4001);
        let sigma = 1.5;
        let intensity = gaussian_array(x.view(), 0.0, sigma).mapv(|v| v * v);
        let width = rms_width(x.view(), intensity.view()).unwrap();
        assert_relative_eq!(width, sigma / 2.0_f64.sqrt(), max_relative = 1e-6);
    }

    #[test]
    fn test_rms_width_rejects_empty_distribution() {
        let x = Array1::linspace(0.0, 1.0, 5);
        let y = Array1::zeros(5);
        assert!(rms_width(x.view(), y.view()).is_none());
    }
}
