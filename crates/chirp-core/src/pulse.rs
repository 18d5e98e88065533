//! The pulse state handle: a grid plus the complex fields living on it.
//!
//! A [`Pulse`] owns its [`FourierTransform`] and the spectral and temporal
//! field buffers. Operations in [`crate::grating`] and
//! [`crate::normal_pulse`] borrow it explicitly; nothing holds on to a pulse
//! between calls.

use ndarray::Array1;
use num_complex::Complex64;

use crate::constants::{angular_frequency_to_wavelength, wavelength_to_angular_frequency};
use crate::grid::{FourierTransform, GridError};
use crate::numerics::rms_width;

/// An optical pulse described by its envelope on a discretised grid.
#[derive(Debug, Clone)]
pub struct Pulse {
    ft: FourierTransform,
    /// Central (carrier) wavelength (m).
    wl0: f64,
    /// Carrier angular frequency (rad/s).
    carrier: f64,
    /// Wavelength of each frequency sample (m), aligned with `w`.
    wl: Array1<f64>,
    spectral_intensity: Array1<Complex64>,
    temporal_intensity: Array1<Complex64>,
    /// Output slot for the grating-pair stretcher.
    stretched_intensity: Option<Array1<Complex64>>,
}

impl Pulse {
    /// Create a zero-field pulse centred at `wl0` (m).
    pub fn new(ft: FourierTransform, wl0: f64) -> Result<Self, GridError> {
        if !(wl0 > 0.0) || !wl0.is_finite() {
            return Err(GridError::InvalidWavelength(wl0));
        }
        let carrier = wavelength_to_angular_frequency(wl0);
        let wl = ft.w().mapv(|w| angular_frequency_to_wavelength(w + carrier));
        let n = ft.n();
        Ok(Self {
            ft,
            wl0,
            carrier,
            wl,
            spectral_intensity: Array1::zeros(n),
            temporal_intensity: Array1::zeros(n),
            stretched_intensity: None,
        })
    }

    pub fn ft(&self) -> &FourierTransform {
        &self.ft
    }

    /// Number of grid samples.
    pub fn n(&self) -> usize {
        self.ft.n()
    }

    pub fn t(&self) -> &Array1<f64> {
        self.ft.t()
    }

    pub fn w(&self) -> &Array1<f64> {
        self.ft.w()
    }

    pub fn wl(&self) -> &Array1<f64> {
        &self.wl
    }

    pub fn wl0(&self) -> f64 {
        self.wl0
    }

    /// Carrier angular frequency (rad/s).
    pub fn carrier(&self) -> f64 {
        self.carrier
    }

    /// `(min, max)` of the wavelength array (m). Samples whose absolute
    /// frequency is not positive are ignored.
    pub fn wavelength_range(&self) -> (f64, f64) {
        self.wl
            .iter()
            .filter(|v| v.is_finite() && **v > 0.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn spectral_intensity(&self) -> &Array1<Complex64> {
        &self.spectral_intensity
    }

    pub fn temporal_intensity(&self) -> &Array1<Complex64> {
        &self.temporal_intensity
    }

    /// Field produced by the most recent stretch, if any.
    pub fn stretched_intensity(&self) -> Option<&Array1<Complex64>> {
        self.stretched_intensity.as_ref()
    }

    /// Set the spectrum; the temporal field is recomputed by the backward
    /// transform.
    pub fn set_spectral_intensity(&mut self, spectrum: Array1<Complex64>) -> Result<(), GridError> {
        let field = self.ft.backward(&spectrum)?;
        self.spectral_intensity = spectrum;
        self.temporal_intensity = field;
        Ok(())
    }

    /// Set the temporal field; the spectrum is recomputed by the forward
    /// transform.
    pub fn set_temporal_intensity(&mut self, field: Array1<Complex64>) -> Result<(), GridError> {
        let spectrum = self.ft.forward(&field)?;
        self.temporal_intensity = field;
        self.spectral_intensity = spectrum;
        Ok(())
    }

    pub(crate) fn store_stretched(&mut self, field: Array1<Complex64>) -> Result<(), GridError> {
        self.ft.check_len(field.len())?;
        self.stretched_intensity = Some(field);
        Ok(())
    }

    /// RMS duration of |E(t)|² (s).
    pub fn rms_duration(&self) -> Option<f64> {
        let intensity = self.temporal_intensity.mapv(|e| e.norm_sqr());
        rms_width(self.t().view(), intensity.view())
    }

    /// RMS angular bandwidth of |Ẽ(ω)|² (rad/s).
    pub fn rms_bandwidth(&self) -> Option<f64> {
        let intensity = self.spectral_intensity.mapv(|e| e.norm_sqr());
        rms_width(self.w().view(), intensity.view())
    }
}
