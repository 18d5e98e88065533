//! Discretised time/frequency grid and its spectral transform pair.
//!
//! The temporal axis is $t_k = t_0 + k\,\Delta t$ and the angular-frequency
//! axis is $\omega_j = \omega_0 + j\,\Delta\omega$ with
//! $\Delta t\,\Delta\omega = 2\pi / N$. With that reciprocity the transforms
//!
//! $$
//! \tilde{E}(\omega_j) = \frac{\Delta t}{2\pi} \sum_k E(t_k)\, e^{i\omega_j t_k}, \qquad
//! E(t_k) = \Delta\omega \sum_j \tilde{E}(\omega_j)\, e^{-i\omega_j t_k}
//! $$
//!
//! are exact inverses of one another (up to rounding), for arbitrary offsets
//! $t_0$ and $\omega_0$.

use std::fmt;
use std::sync::Arc;

use chirp_compute::{ComputeBackend, ComputeError};
use ndarray::Array1;
use num_complex::Complex64;
use thiserror::Error;

use crate::constants::TWO_PI;

/// Errors from grid construction and spectral transforms.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Grid needs at least 2 samples, got {0}")]
    TooFewPoints(usize),

    #[error("Grid step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("Invalid time range [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },

    #[error("Grid offsets must be finite, got t0 = {t0} s, w0 = {w0} rad/s")]
    InvalidOffset { t0: f64, w0: f64 },

    #[error("Central wavelength must be positive and finite, got {0} m")]
    InvalidWavelength(f64),

    #[error("Array of length {actual} does not match grid of {expected} samples")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Compute backend error: {0}")]
    Compute(#[from] ComputeError),
}

/// A uniformly sampled time/frequency grid with a forward/backward
/// transform pair.
#[derive(Clone)]
pub struct FourierTransform {
    n: usize,
    dt: f64,
    dw: f64,
    t: Array1<f64>,
    w: Array1<f64>,
    backend: Arc<dyn ComputeBackend>,
}

impl fmt::Debug for FourierTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FourierTransform")
            .field("n", &self.n)
            .field("dt", &self.dt)
            .field("dw", &self.dw)
            .field("t0", &self.t[0])
            .field("w0", &self.w[0])
            .field("backend", &self.backend.device_info().name)
            .finish()
    }
}

impl FourierTransform {
    /// Create a grid of `n` samples with time step `dt`, centred so that
    /// `t[n/2] == 0` and `w[n/2] == 0`.
    pub fn new(n: usize, dt: f64) -> Result<Self, GridError> {
        Self::validate(n, dt)?;
        let dw = TWO_PI / (n as f64 * dt);
        let half = (n / 2) as f64;
        Self::with_offsets(n, dt, -half * dt, -half * dw)
    }

    /// Create a grid with explicit first samples `t0` and `w0`.
    pub fn with_offsets(n: usize, dt: f64, t0: f64, w0: f64) -> Result<Self, GridError> {
        Self::validate(n, dt)?;
        if !t0.is_finite() || !w0.is_finite() {
            return Err(GridError::InvalidOffset { t0, w0 });
        }
        let dw = TWO_PI / (n as f64 * dt);
        let t = Array1::from_shape_fn(n, |k| t0 + k as f64 * dt);
        let w = Array1::from_shape_fn(n, |j| w0 + j as f64 * dw);
        Ok(Self {
            n,
            dt,
            dw,
            t,
            w,
            backend: chirp_compute::default_backend(),
        })
    }

    /// Place `n` samples uniformly on `[t_start, t_end]` (both inclusive).
    /// The frequency axis uses the centred default offset.
    pub fn from_time_range(n: usize, t_start: f64, t_end: f64) -> Result<Self, GridError> {
        if n < 2 {
            return Err(GridError::TooFewPoints(n));
        }
        if !(t_end > t_start) || !t_start.is_finite() || !t_end.is_finite() {
            return Err(GridError::InvalidRange {
                start: t_start,
                end: t_end,
            });
        }
        let dt = (t_end - t_start) / (n - 1) as f64;
        Self::validate(n, dt)?;
        let dw = TWO_PI / (n as f64 * dt);
        Self::with_offsets(n, dt, t_start, -((n / 2) as f64) * dw)
    }

    /// Replace the compute backend used for the transforms.
    pub fn with_backend(mut self, backend: Arc<dyn ComputeBackend>) -> Self {
        self.backend = backend;
        self
    }

    fn validate(n: usize, dt: f64) -> Result<(), GridError> {
        if n < 2 {
            return Err(GridError::TooFewPoints(n));
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(GridError::InvalidStep(dt));
        }
        Ok(())
    }

    /// Number of samples.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Time step (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Angular-frequency step (rad/s).
    pub fn dw(&self) -> f64 {
        self.dw
    }

    /// Time samples (s).
    pub fn t(&self) -> &Array1<f64> {
        &self.t
    }

    /// Angular-frequency samples (rad/s), relative to the carrier.
    pub fn w(&self) -> &Array1<f64> {
        &self.w
    }

    pub fn backend(&self) -> &Arc<dyn ComputeBackend> {
        &self.backend
    }

    /// Temporal field to spectrum.
    pub fn forward(&self, field: &Array1<Complex64>) -> Result<Array1<Complex64>, GridError> {
        self.check_len(field.len())?;
        let scale = self.dt / TWO_PI;
        let (t, w) = (&self.t, &self.w);
        let out = self.backend.parallel_vector_fill(self.n, &|j| {
            let wj = w[j];
            let sum: Complex64 = field
                .iter()
                .zip(t.iter())
                .map(|(e, &tk)| e * Complex64::from_polar(1.0, wj * tk))
                .sum();
            sum * scale
        })?;
        Ok(out)
    }

    /// Spectrum to temporal field.
    pub fn backward(&self, spectrum: &Array1<Complex64>) -> Result<Array1<Complex64>, GridError> {
        self.check_len(spectrum.len())?;
        let scale = self.dw;
        let (t, w) = (&self.t, &self.w);
        let out = self.backend.parallel_vector_fill(self.n, &|k| {
            let tk = t[k];
            let sum: Complex64 = spectrum
                .iter()
                .zip(w.iter())
                .map(|(s, &wj)| s * Complex64::from_polar(1.0, -wj * tk))
                .sum();
            sum * scale
        })?;
        Ok(out)
    }

    pub(crate) fn check_len(&self, len: usize) -> Result<(), GridError> {
        if len != self.n {
            return Err(GridError::ShapeMismatch {
                expected: self.n,
                actual: len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chirp_compute::SerialBackend;

    #[test]
    fn test_grid_reciprocity() {
        let ft = FourierTransform::new(64, 1e-15).unwrap();
        assert_relative_eq!(ft.dt() * ft.dw() * 64.0, TWO_PI, max_relative = 1e-12);
        assert_eq!(ft.t()[32], 0.0);
        assert_eq!(ft.w()[32], 0.0);
        assert_eq!(ft.t().len(), ft.w().len());
    }

    #[test]
    fn test_from_time_range_hits_endpoints() {
        let ft = FourierTransform::from_time_range(1024, -50e-12, 50e-12).unwrap();
        assert_relative_eq!(ft.t()[0], -50e-12, max_relative = 1e-12);
        assert_relative_eq!(ft.t()[1023], 50e-12, max_relative = 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(matches!(FourierTransform::new(1, 1.0), Err(GridError::TooFewPoints(1))));
        assert!(matches!(FourierTransform::new(8, 0.0), Err(GridError::InvalidStep(_))));
        assert!(matches!(
            FourierTransform::from_time_range(8, 1.0, -1.0),
            Err(GridError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_offsets() {
        assert!(matches!(
            FourierTransform::with_offsets(8, 1.0, f64::NAN, 0.0),
            Err(GridError::InvalidOffset { .. })
        ));
        let err = FourierTransform::with_offsets(8, 1.0, 0.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, GridError::InvalidOffset { .. }));
        assert!(err.to_string().contains("w0 = inf"), "{}", err);
    }

    #[test]
    fn test_forward_backward_round_trip_with_offsets() {
        let ft = FourierTransform::with_offsets(48, 0.1, -2.3, -95.0)
            .unwrap()
            .with_backend(Arc::new(SerialBackend));
        let field = Array1::from_shape_fn(48, |k| {
            Complex64::new((0.3 * k as f64).sin(), (0.17 * k as f64).cos())
        });
        let back = ft.backward(&ft.forward(&field).unwrap()).unwrap();
        for (a, b) in field.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-10, "{} != {}", a, b);
        }
    }

    #[test]
    fn test_transform_rejects_wrong_length() {
        let ft = FourierTransform::new(16, 1.0).unwrap();
        let short = Array1::zeros(8);
        assert!(matches!(
            ft.forward(&short),
            Err(GridError::ShapeMismatch { expected: 16, actual: 8 })
        ));
    }
}
