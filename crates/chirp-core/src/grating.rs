//! Grating-pair stretcher: group-delay and third-order dispersion.
//!
//! A pair of parallel diffraction gratings separated by $L_g$ imparts a
//! spectral phase whose second- and third-order Taylor coefficients at the
//! central wavelength $\lambda$ are
//!
//! $$
//! \mathrm{GVD} = -\frac{2\lambda^3 L_g}{2\pi c^2 d^2}
//!   \left[1 - \left(\frac{\lambda}{d} - \sin\theta\right)^2\right]^{-3/2}
//! $$
//!
//! $$
//! \mathrm{TOD} = -\frac{3\pi\lambda}{2c}\,\mathrm{GVD}\,
//!   \frac{1 + \frac{\lambda}{d}\sin\theta - \sin^2\theta}
//!        {1 - \left(\frac{\lambda}{d} - \sin^2\theta\right)}
//! $$
//!
//! where $d$ is the groove spacing and $\theta$ the angle of incidence. A
//! negative separation models a compressor.
//!
//! The spectral phase factor applied to the pulse spectrum is
//! $\exp\left(i\tfrac12\mathrm{GVD}\,\omega^2 + i\tfrac16\mathrm{TOD}\,\omega^2\right)$
//! on the relative frequency axis $\omega$.

use std::f64::consts::PI;

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chirp_compute::ComputeError;

use crate::constants::{SPEED_OF_LIGHT, TWO_PI};
use crate::grid::GridError;
use crate::pulse::Pulse;

/// Errors from the grating-pair dispersion model.
#[derive(Debug, Error)]
pub enum DispersionError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Compute backend error: {0}")]
    Compute(#[from] ComputeError),
}

/// Geometry of a grating-pair stretcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GratingGeometry {
    /// Angle of incidence on the first grating (radians).
    pub theta: f64,
    /// Groove density (lines/mm).
    pub groove_density: f64,
    /// Grating separation (m). Negative for a compressor.
    pub separation: f64,
}

impl GratingGeometry {
    /// Groove spacing $d$ (m).
    pub fn line_spacing(&self) -> f64 {
        1.0 / (self.groove_density * 1e3)
    }
}

/// Second- and third-order dispersion at the central wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionCoefficients {
    /// Group-velocity dispersion (s²).
    pub gvd: f64,
    /// Third-order dispersion (s³).
    pub tod: f64,
}

/// Output of [`GratingPair::stretched_field`].
#[derive(Debug, Clone)]
pub struct StretchResult {
    pub coefficients: DispersionCoefficients,
    /// Stretched temporal field. Take the modulus for the envelope.
    pub field: Array1<Complex64>,
}

/// A grating-pair stretcher (or compressor).
#[derive(Debug, Clone)]
pub struct GratingPair {
    geometry: GratingGeometry,
}

impl GratingPair {
    pub fn new(geometry: GratingGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &GratingGeometry {
        &self.geometry
    }

    /// GVD at wavelength `wl` (m).
    ///
    /// No validation is performed: geometries outside the grating equation's
    /// real range produce NaN or infinity. Use [`GratingPair::dispersion`]
    /// for the checked form.
    pub fn compute_gvd(&self, wl: f64) -> f64 {
        let GratingGeometry {
            theta, separation, ..
        } = self.geometry;
        let d = self.geometry.line_spacing();
        let c = SPEED_OF_LIGHT;
        let diffraction = wl / d - theta.sin();
        -(2.0 * wl.powi(3) * separation / (TWO_PI * c * c * d * d))
            * (1.0 - diffraction * diffraction).powf(-1.5)
    }

    /// TOD at wavelength `wl` (m), given the GVD at the same wavelength.
    pub fn compute_tod(&self, wl: f64, gvd: f64) -> f64 {
        let theta = self.geometry.theta;
        let d = self.geometry.line_spacing();
        let (sin, sin2) = (theta.sin(), theta.sin().powi(2));
        let numerator = 1.0 + wl / d * sin - sin2;
        let denominator = 1.0 - (wl / d - sin2);
        -(3.0 * PI * wl / (2.0 * SPEED_OF_LIGHT)) * gvd * (numerator / denominator)
    }

    /// Check that the geometry admits a real first-order diffraction angle
    /// at `wl`, i.e. $|\lambda/d - \sin\theta| < 1$.
    pub fn check_geometry(&self, wl: f64) -> Result<(), DispersionError> {
        let g = &self.geometry;
        if !(g.groove_density > 0.0) || !g.groove_density.is_finite() {
            return Err(DispersionError::InvalidGeometry(format!(
                "groove density must be positive, got {} lines/mm",
                g.groove_density
            )));
        }
        if !g.theta.is_finite() || !g.separation.is_finite() {
            return Err(DispersionError::InvalidGeometry(format!(
                "non-finite angle ({}) or separation ({})",
                g.theta, g.separation
            )));
        }
        if !(wl > 0.0) || !wl.is_finite() {
            return Err(DispersionError::InvalidGeometry(format!(
                "wavelength must be positive, got {} m",
                wl
            )));
        }
        let diffraction = wl / g.line_spacing() - g.theta.sin();
        if diffraction.abs() >= 1.0 {
            return Err(DispersionError::InvalidGeometry(format!(
                "|λ/d − sin θ| = {:.4} ≥ 1: no real diffraction order at λ = {:.1} nm",
                diffraction.abs(),
                wl * 1e9
            )));
        }
        Ok(())
    }

    /// Checked GVD and TOD at wavelength `wl` (m).
    pub fn dispersion(&self, wl: f64) -> Result<DispersionCoefficients, DispersionError> {
        self.check_geometry(wl)?;
        let gvd = self.compute_gvd(wl);
        let tod = self.compute_tod(wl, gvd);
        if !gvd.is_finite() || !tod.is_finite() {
            return Err(DispersionError::InvalidGeometry(format!(
                "non-finite dispersion (GVD = {:e}, TOD = {:e})",
                gvd, tod
            )));
        }
        log::debug!(
            "Grating pair at λ={:.1} nm: GVD={:.4e} s², TOD={:.4e} s³",
            wl * 1e9,
            gvd,
            tod
        );
        Ok(DispersionCoefficients { gvd, tod })
    }

    /// Spectral phase factor over the frequency axis `w`.
    pub fn spectral_phase(w: &Array1<f64>, coefficients: &DispersionCoefficients) -> Array1<Complex64> {
        let DispersionCoefficients { gvd, tod } = *coefficients;
        w.mapv(|wi| {
            let w2 = wi * wi;
            Complex64::new(0.0, 0.5 * gvd * w2 + tod / 6.0 * w2).exp()
        })
    }

    /// Compute the stretched temporal field without touching the pulse.
    pub fn stretched_field(&self, pulse: &Pulse) -> Result<StretchResult, DispersionError> {
        let wl0 = pulse.wl0();
        let (wl_min, wl_max) = pulse.wavelength_range();
        if wl0 < wl_min || wl0 > wl_max {
            log::warn!(
                "Central wavelength {:.1} nm outside grid range [{:.1}, {:.1}] nm",
                wl0 * 1e9,
                wl_min * 1e9,
                wl_max * 1e9
            );
        }

        let coefficients = self.dispersion(wl0)?;
        let phase = Self::spectral_phase(pulse.w(), &coefficients);
        let backend = pulse.ft().backend();
        let spectrum = backend.elementwise_product(&phase, pulse.spectral_intensity())?;
        let field = pulse.ft().backward(&spectrum)?;
        Ok(StretchResult {
            coefficients,
            field,
        })
    }

    /// Stretch the pulse, storing the result in its stretched-field slot.
    ///
    /// The pulse spectrum and temporal field are left unchanged; a previous
    /// stretch result is overwritten.
    pub fn stretch(&self, pulse: &mut Pulse) -> Result<DispersionCoefficients, DispersionError> {
        let StretchResult {
            coefficients,
            field,
        } = self.stretched_field(pulse)?;
        pulse.store_stretched(field)?;
        Ok(coefficients)
    }
}

/// Build a stretcher from `geometry` and apply it to `pulse`.
pub fn stretch_pulse(
    pulse: &mut Pulse,
    geometry: GratingGeometry,
) -> Result<DispersionCoefficients, DispersionError> {
    GratingPair::new(geometry).stretch(pulse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_pair() -> GratingPair {
        GratingPair::new(GratingGeometry {
            theta: 0.3,
            groove_density: 600.0,
            separation: 0.1,
        })
    }

    #[test]
    fn test_line_spacing_from_groove_density() {
        let g = reference_pair();
        assert!((g.geometry().line_spacing() - 1.0 / 600e3).abs() < 1e-18);
    }

    #[test]
    fn test_gvd_scales_linearly_with_separation() {
        let a = reference_pair();
        let b = GratingPair::new(GratingGeometry {
            separation: 0.2,
            ..*a.geometry()
        });
        let ratio = b.compute_gvd(800e-9) / a.compute_gvd(800e-9);
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_separation_flips_sign() {
        let a = reference_pair();
        let b = GratingPair::new(GratingGeometry {
            separation: -0.1,
            ..*a.geometry()
        });
        let ca = a.dispersion(800e-9).unwrap();
        let cb = b.dispersion(800e-9).unwrap();
        assert_eq!(ca.gvd, -cb.gvd);
        assert_eq!(ca.tod, -cb.tod);
    }

    #[test]
    fn test_unchecked_gvd_is_nan_beyond_diffraction_limit() {
        // λ/d = 1.6 at 1200 lines/mm and 1333 nm: no real diffraction order
        let g = GratingPair::new(GratingGeometry {
            theta: 0.0,
            groove_density: 1200.0,
            separation: 0.1,
        });
        assert!(g.compute_gvd(1333e-9).is_nan());
        assert!(matches!(
            g.dispersion(1333e-9),
            Err(DispersionError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_zero_phase_for_zero_dispersion() {
        let w = Array1::linspace(-1e14, 1e14, 11);
        let phase = GratingPair::spectral_phase(&w, &DispersionCoefficients { gvd: 0.0, tod: 0.0 });
        assert!(phase.iter().all(|p| *p == Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_rejects_non_positive_groove_density() {
        let g = GratingPair::new(GratingGeometry {
            theta: 0.3,
            groove_density: 0.0,
            separation: 0.1,
        });
        assert!(matches!(
            g.dispersion(800e-9),
            Err(DispersionError::InvalidGeometry(_))
        ));
    }
}
