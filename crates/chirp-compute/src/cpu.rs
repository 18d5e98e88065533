//! CPU compute backend using Rayon for shared-memory parallelism.

use ndarray::Array1;
use num_complex::Complex64;

use crate::backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// CPU backend that parallelises work across threads via Rayon.
pub struct CpuBackend {
    num_threads: usize,
}

impl CpuBackend {
    /// Create a new CPU backend using all available threads.
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            backend_type: BackendType::Cpu,
            compute_units: Some(self.num_threads),
        }
    }

    fn parallel_vector_fill(
        &self,
        len: usize,
        fill_fn: &(dyn Fn(usize) -> Complex64 + Send + Sync),
    ) -> Result<Array1<Complex64>, ComputeError> {
        use rayon::prelude::*;

        let data: Vec<Complex64> = (0..len).into_par_iter().map(fill_fn).collect();
        Ok(Array1::from_vec(data))
    }
}
