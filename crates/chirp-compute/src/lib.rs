//! # Chirp Compute
//!
//! Compute backend abstraction for the Chirp framework. This crate provides a
//! [`ComputeBackend`](backend::ComputeBackend) trait that keeps the pulse
//! physics in `chirp-core` independent of how the hot loops are executed.
//!
//! ## Available backends
//!
//! | Backend | Feature flag | Status |
//! |---------|-------------|--------|
//! | CPU (Rayon) | `cpu` (default) | Implemented |
//! | Serial | always | Implemented |

pub mod backend;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo, SerialBackend};

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;

/// The backend used when the caller does not choose one.
#[cfg(feature = "cpu")]
pub fn default_backend() -> std::sync::Arc<dyn ComputeBackend> {
    std::sync::Arc::new(CpuBackend::new())
}

/// The backend used when the caller does not choose one.
#[cfg(not(feature = "cpu"))]
pub fn default_backend() -> std::sync::Arc<dyn ComputeBackend> {
    std::sync::Arc::new(SerialBackend)
}
