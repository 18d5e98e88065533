//! # Chirp Core
//!
//! Numerical core of the Chirp framework: dispersion of ultrafast pulses by
//! grating-pair stretchers and synthesis of transform-limited reference
//! pulses on a discretised time/frequency grid.
//!
//! ## Architecture
//!
//! A [`pulse::Pulse`] owns a [`grid::FourierTransform`] together with its
//! spectral and temporal fields. The two operations borrow a pulse
//! explicitly and write back into its buffers:
//!
//! - [`grating::GratingPair::stretch`] applies the GVD/TOD phase of a
//!   grating pair and stores the stretched temporal field.
//! - [`normal_pulse::normal_pulse`] writes a centred Gaussian spectrum with a
//!   prescribed time-bandwidth product, or reports that the grid cannot hold it.
//!
//! ## Modules
//!
//! - [`constants`] — Speed of light and fixed numerical targets.
//! - [`numerics`] — Gaussian and moment helpers.
//! - [`grid`] — Time/frequency grid and transform pair.
//! - [`pulse`] — Pulse state handle.
//! - [`grating`] — Grating-pair dispersion.
//! - [`normal_pulse`] — Normal-pulse synthesis.

pub mod constants;
pub mod grating;
pub mod grid;
pub mod normal_pulse;
pub mod numerics;
pub mod pulse;

pub use grating::{
    stretch_pulse, DispersionCoefficients, DispersionError, GratingGeometry, GratingPair,
    StretchResult,
};
pub use grid::{FourierTransform, GridError};
pub use normal_pulse::{
    normal_pulse, normal_pulse_parameters, NormalPulseOptions, NormalPulseParameters,
    SynthesisError,
};
pub use pulse::Pulse;
