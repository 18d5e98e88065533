//! Compute backend trait and device abstraction.
//!
//! The [`ComputeBackend`] trait abstracts over execution environments so that
//! the spectral transforms in `chirp-core` stay device-agnostic.

use ndarray::Array1;
use num_complex::Complex64;
use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Describes the capabilities of a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub compute_units: Option<usize>,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Cpu,
    Serial,
}

/// Abstraction over compute backends.
///
/// Spectral code operates against this trait. Each output sample of a
/// discrete transform is an independent reduction over the input, which is
/// exactly the shape of [`ComputeBackend::parallel_vector_fill`].
pub trait ComputeBackend: Send + Sync {
    /// Return information about the device.
    fn device_info(&self) -> DeviceInfo;

    /// Fill a complex vector of length `len`, evaluating `fill_fn(i)` for
    /// every index. Evaluation order is unspecified.
    fn parallel_vector_fill(
        &self,
        len: usize,
        fill_fn: &(dyn Fn(usize) -> Complex64 + Send + Sync),
    ) -> Result<Array1<Complex64>, ComputeError>;

    /// Element-wise product $y_i = a_i b_i$.
    fn elementwise_product(
        &self,
        a: &Array1<Complex64>,
        b: &Array1<Complex64>,
    ) -> Result<Array1<Complex64>, ComputeError> {
        if a.len() != b.len() {
            return Err(ComputeError::LengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(a * b)
    }
}

/// Single-threaded backend. Always available; useful for reproducing
/// results without a thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl ComputeBackend for SerialBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Serial".into(),
            backend_type: BackendType::Serial,
            compute_units: Some(1),
        }
    }

    fn parallel_vector_fill(
        &self,
        len: usize,
        fill_fn: &(dyn Fn(usize) -> Complex64 + Send + Sync),
    ) -> Result<Array1<Complex64>, ComputeError> {
        Ok(Array1::from_shape_fn(len, fill_fn))
    }
}
