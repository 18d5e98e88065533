//! Integration tests for normal-pulse synthesis.
//!
//! - 1024-sample picosecond grid with the default edge value
//! - Feasibility boundary just below and just above the grid limit
//! - Failure leaves the pulse untouched; success is idempotent
//! - Synthesised pulse reaches the target time-bandwidth product

use approx::assert_relative_eq;
use num_complex::Complex64;

use chirp_core::grid::FourierTransform;
use chirp_core::normal_pulse::{
    default_edge_value, normal_pulse, normal_pulse_parameters, NormalPulseOptions, SynthesisError,
};
use chirp_core::numerics::gaussian;
use chirp_core::pulse::Pulse;

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

fn picosecond_pulse() -> Pulse {
    let ft = FourierTransform::from_time_range(1024, -50e-12, 50e-12).unwrap();
    Pulse::new(ft, 800e-9).unwrap()
}

fn small_pulse(n: usize) -> Pulse {
    Pulse::new(FourierTransform::new(n, 1e-14).unwrap(), 800e-9).unwrap()
}

/// Edge value at which the required temporal width equals the grid limit,
/// scaled by `factor` in log space (`factor < 1` is feasible).
fn edge_value_at_boundary(pulse: &Pulse, factor: f64) -> f64 {
    let (t, w) = (pulse.t(), pulse.w());
    let span_t = t[t.len() - 1] - t[0];
    let span_w = w[w.len() - 1] - w[0];
    (-0.125 * span_t * span_w * factor).exp()
}

fn options(edge_value: f64) -> NormalPulseOptions {
    NormalPulseOptions {
        edge_value: Some(edge_value),
        ..Default::default()
    }
}

// ─────────────────────────────────────────────────────────────
// Picosecond grid
// ─────────────────────────────────────────────────────────────

#[test]
fn test_default_edge_value_on_picosecond_grid() {
    let mut pulse = picosecond_pulse();
    let params = normal_pulse(&mut pulse, &NormalPulseOptions::default()).expect("feasible");

    assert_eq!(params.edge_value, 1024.0 * f64::EPSILON);
    assert!(params.feasible);
    assert!(params.temporal_width < params.max_temporal_width);

    // Peak of the Gaussian is 1, so the edges hold exactly edge_value.
    let s = pulse.spectral_intensity();
    assert_relative_eq!(s[0].norm(), params.edge_value, max_relative = 1e-9);
    assert_relative_eq!(s[s.len() - 1].norm(), params.edge_value, max_relative = 1e-9);
    let peak = s.iter().map(|v| v.norm()).fold(0.0, f64::max);
    assert!(peak <= 1.0 + 1e-12 && peak > 0.99, "peak = {}", peak);
}

#[test]
fn test_spectrum_is_centred_gaussian_of_derived_width() {
    let mut pulse = picosecond_pulse();
    let params = normal_pulse(&mut pulse, &NormalPulseOptions::default()).unwrap();
    let w = pulse.w();
    assert_relative_eq!(
        params.spectral_center,
        0.5 * (w[0] + w[w.len() - 1]),
        epsilon = 1e-3
    );

    for (wi, si) in w.iter().zip(pulse.spectral_intensity().iter()) {
        let expected = gaussian(*wi, params.spectral_center, params.spectral_width);
        assert!((si.norm() - expected).abs() < 1e-12);
    }
    assert_relative_eq!(params.temporal_width * params.spectral_width, 1.0, max_relative = 1e-12);
}

#[test]
fn test_synthesised_pulse_is_transform_limited() {
    let mut pulse = picosecond_pulse();
    normal_pulse(&mut pulse, &NormalPulseOptions::default()).unwrap();
    let tbp = pulse.rms_duration().unwrap() * pulse.rms_bandwidth().unwrap();
    assert_relative_eq!(tbp, 0.5, max_relative = 1e-3);
}

#[test]
fn test_reference_phase_is_unit_modulus() {
    let mut pulse = picosecond_pulse();
    normal_pulse(&mut pulse, &NormalPulseOptions::default()).unwrap();
    let s = pulse.spectral_intensity();
    let mid = s.len() / 2;
    let phase = s[mid] / s[mid].norm();
    assert!((phase - Complex64::new(1.0, 0.0)).norm() < 1e-14);
}

// ─────────────────────────────────────────────────────────────
// Feasibility boundary
// ─────────────────────────────────────────────────────────────

#[test]
fn test_just_inside_boundary_succeeds() {
    let mut pulse = small_pulse(16);
    let edge = edge_value_at_boundary(&pulse, 0.99);
    let params = normal_pulse(&mut pulse, &options(edge)).expect("just feasible");
    assert!(params.temporal_width < params.max_temporal_width);
    assert_relative_eq!(
        params.temporal_width / params.max_temporal_width,
        0.99,
        max_relative = 1e-9
    );
    let s = pulse.spectral_intensity();
    assert_relative_eq!(s[0].norm(), edge, max_relative = 1e-9);
}

#[test]
fn test_just_outside_boundary_fails_without_mutation() {
    let mut pulse = small_pulse(16);
    let edge = edge_value_at_boundary(&pulse, 1.01);

    let params = normal_pulse_parameters(&pulse, &options(edge)).unwrap();
    assert!(!params.feasible);

    match normal_pulse(&mut pulse, &options(edge)) {
        Err(SynthesisError::InfeasibleTimeBandwidthProduct {
            temporal_width,
            max_temporal_width,
        }) => assert!(temporal_width > max_temporal_width),
        other => panic!("expected infeasible TBP, got {:?}", other),
    }
    assert!(pulse.spectral_intensity().iter().all(|v| *v == Complex64::new(0.0, 0.0)));
    assert!(pulse.temporal_intensity().iter().all(|v| *v == Complex64::new(0.0, 0.0)));
}

#[test]
fn test_default_edge_value_is_infeasible_on_tiny_grid() {
    let mut pulse = small_pulse(16);
    assert_eq!(default_edge_value(16), 16.0 * f64::EPSILON);
    assert!(matches!(
        normal_pulse(&mut pulse, &NormalPulseOptions::default()),
        Err(SynthesisError::InfeasibleTimeBandwidthProduct { .. })
    ));
}

// ─────────────────────────────────────────────────────────────
// Idempotence
// ─────────────────────────────────────────────────────────────

#[test]
fn test_repeated_synthesis_is_identical() {
    let mut pulse = small_pulse(128);
    let a = normal_pulse(&mut pulse, &NormalPulseOptions::default()).unwrap();
    let first = pulse.spectral_intensity().clone();
    let b = normal_pulse(&mut pulse, &NormalPulseOptions::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(pulse.spectral_intensity(), &first);
}

#[test]
fn test_options_deserialise_with_defaults() {
    let opts: NormalPulseOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, NormalPulseOptions::default());
    let opts: NormalPulseOptions = serde_json::from_str(r#"{"edge_value": 1e-10}"#).unwrap();
    assert_eq!(opts.edge_value, Some(1e-10));
    assert_eq!(opts.target_tbp, 0.5);
}
