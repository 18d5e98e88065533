//! Synthesis of "normal" pulses: centred Gaussians with a prescribed
//! time-bandwidth product.
//!
//! The spectral width is chosen so that the Gaussian falls to exactly
//! `edge_value` (relative to its peak) at the edges of the frequency grid:
//!
//! $$
//! \sigma_\omega = \sqrt{\frac{-(\omega_N - \omega_1)^2}{8 \ln \varepsilon}}
//! $$
//!
//! The same expression on the time axis gives the widest pulse the grid can
//! hold. The temporal width implied by the uncertainty relation,
//! $\sigma_t = 2\,\mathrm{TBP} / \sigma_\omega$, must not exceed it.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{TRANSFORM_LIMITED_TBP, TWO_PI};
use crate::grid::GridError;
use crate::numerics::gaussian_array;
use crate::pulse::Pulse;

/// Errors from normal-pulse synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(
        "The required time-bandwidth product cannot be reached: temporal width {temporal_width:.4e} s \
         exceeds grid limit {max_temporal_width:.4e} s (decrease edge_value or increase the number of grid points)"
    )]
    InfeasibleTimeBandwidthProduct {
        temporal_width: f64,
        max_temporal_width: f64,
    },

    #[error("Edge value must lie in (0, 1), got {0}")]
    InvalidEdgeValue(f64),

    #[error("Target time-bandwidth product must be positive, got {0}")]
    InvalidTarget(f64),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// Options for [`normal_pulse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPulseOptions {
    /// Maximal relative amplitude at the grid edges. `None` selects
    /// [`default_edge_value`].
    #[serde(default)]
    pub edge_value: Option<f64>,
    /// Time-bandwidth product to reach.
    #[serde(default = "default_target_tbp")]
    pub target_tbp: f64,
}

fn default_target_tbp() -> f64 {
    TRANSFORM_LIMITED_TBP
}

impl Default for NormalPulseOptions {
    fn default() -> Self {
        Self {
            edge_value: None,
            target_tbp: TRANSFORM_LIMITED_TBP,
        }
    }
}

/// Widths derived from the grid for a given edge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPulseParameters {
    pub edge_value: f64,
    /// Centre of the time axis (s).
    pub temporal_center: f64,
    /// Centre of the frequency axis (rad/s).
    pub spectral_center: f64,
    /// Gaussian σ in angular frequency (rad/s).
    pub spectral_width: f64,
    /// Largest temporal σ the time axis holds within `edge_value` (s).
    pub max_temporal_width: f64,
    /// Temporal σ implied by the target TBP (s).
    pub temporal_width: f64,
    pub feasible: bool,
}

/// Default edge value: roughly the round-off of a transform over `n` samples.
pub fn default_edge_value(n: usize) -> f64 {
    n as f64 * f64::EPSILON
}

/// Width of a Gaussian that drops to `edge_value` at both ends of a grid
/// spanning `[x1, x2]`, given `log_edge = ln(edge_value)`.
fn edge_limited_width(x1: f64, x2: f64, log_edge: f64) -> f64 {
    (-0.125 * (x1 - x2).powi(2) / log_edge).sqrt()
}

/// Derive the normal-pulse widths for `pulse`'s grid without modifying it.
pub fn normal_pulse_parameters(
    pulse: &Pulse,
    options: &NormalPulseOptions,
) -> Result<NormalPulseParameters, SynthesisError> {
    let edge_value = options.edge_value.unwrap_or_else(|| default_edge_value(pulse.n()));
    if !(edge_value > 0.0 && edge_value < 1.0) {
        return Err(SynthesisError::InvalidEdgeValue(edge_value));
    }
    if !(options.target_tbp > 0.0) || !options.target_tbp.is_finite() {
        return Err(SynthesisError::InvalidTarget(options.target_tbp));
    }

    let (t, w) = (pulse.t(), pulse.w());
    let (t1, t2) = (t[0], t[t.len() - 1]);
    let (w1, w2) = (w[0], w[w.len() - 1]);
    let log_edge = edge_value.ln();

    let spectral_width = edge_limited_width(w1, w2, log_edge);
    let max_temporal_width = edge_limited_width(t1, t2, log_edge);
    let temporal_width = 2.0 * options.target_tbp / spectral_width;

    Ok(NormalPulseParameters {
        edge_value,
        temporal_center: 0.5 * (t1 + t2),
        spectral_center: 0.5 * (w1 + w2),
        spectral_width,
        max_temporal_width,
        temporal_width,
        feasible: temporal_width <= max_temporal_width,
    })
}

/// Write a centred Gaussian spectrum with the target time-bandwidth product
/// into `pulse`.
///
/// On failure the pulse is left untouched.
pub fn normal_pulse(
    pulse: &mut Pulse,
    options: &NormalPulseOptions,
) -> Result<NormalPulseParameters, SynthesisError> {
    let params = normal_pulse_parameters(pulse, options)?;
    log::debug!(
        "Normal pulse: edge={:.3e}, σ_ω={:.4e} rad/s, σ_t={:.4e} s (max {:.4e} s)",
        params.edge_value,
        params.spectral_width,
        params.temporal_width,
        params.max_temporal_width
    );

    if !params.feasible {
        log::warn!(
            "The required time-bandwidth product cannot be reached! \
             Decrease edge_value or increase the number of grid points."
        );
        return Err(SynthesisError::InfeasibleTimeBandwidthProduct {
            temporal_width: params.temporal_width,
            max_temporal_width: params.max_temporal_width,
        });
    }

    // Reference phase rotation; unity in magnitude.
    let phase = Complex64::new(0.0, TWO_PI).exp();
    let spectrum: Array1<Complex64> =
        gaussian_array(pulse.w().view(), params.spectral_center, params.spectral_width)
            .mapv(|g| g * phase);
    pulse.set_spectral_intensity(spectrum)?;
    Ok(params)
}
