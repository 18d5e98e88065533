//! Physical constants and fixed numerical targets.

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;

/// $2\pi$.
pub const TWO_PI: f64 = std::f64::consts::TAU;

/// Time-bandwidth product of a transform-limited Gaussian pulse, in the
/// standard-deviation convention used by [`crate::numerics::gaussian`].
pub const TRANSFORM_LIMITED_TBP: f64 = 0.5;

/// Convert a vacuum wavelength (m) to an angular frequency (rad/s).
pub fn wavelength_to_angular_frequency(wavelength_m: f64) -> f64 {
    TWO_PI * SPEED_OF_LIGHT / wavelength_m
}

/// Convert an angular frequency (rad/s) to a vacuum wavelength (m).
pub fn angular_frequency_to_wavelength(omega: f64) -> f64 {
    TWO_PI * SPEED_OF_LIGHT / omega
}
