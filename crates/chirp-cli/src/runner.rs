//! Job runner: ties together grid, normal-pulse synthesis, and stretcher.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use chirp_compute::{ComputeBackend, CpuBackend, SerialBackend};
use chirp_core::grating::{DispersionCoefficients, GratingGeometry, GratingPair};
use chirp_core::grid::FourierTransform;
use chirp_core::normal_pulse::{normal_pulse, normal_pulse_parameters, NormalPulseParameters};
use chirp_core::numerics::rms_width;
use chirp_core::pulse::Pulse;

use crate::config::{GridConfig, JobConfig, SpacingSpec};

/// Results from a job run.
pub struct JobOutput {
    pub pulse: Pulse,
    pub normal_pulse: NormalPulseParameters,
    pub dispersion: Option<DispersionCoefficients>,
}

/// Scalar summary written as JSON.
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub points: usize,
    pub central_wavelength: f64,
    /// Carrier angular frequency (rad/s).
    pub carrier: f64,
    pub normal_pulse: NormalPulseParameters,
    pub dispersion: Option<DispersionCoefficients>,
    pub rms_duration: Option<f64>,
    pub rms_bandwidth: Option<f64>,
    pub stretched_rms_duration: Option<f64>,
}

impl JobOutput {
    pub fn summary(&self) -> JobSummary {
        let stretched_rms_duration = self.pulse.stretched_intensity().and_then(|field| {
            let intensity = field.mapv(|e| e.norm_sqr());
            rms_width(self.pulse.t().view(), intensity.view())
        });
        JobSummary {
            points: self.pulse.n(),
            central_wavelength: self.pulse.wl0(),
            carrier: self.pulse.carrier(),
            normal_pulse: self.normal_pulse,
            dispersion: self.dispersion,
            rms_duration: self.pulse.rms_duration(),
            rms_bandwidth: self.pulse.rms_bandwidth(),
            stretched_rms_duration,
        }
    }
}

/// Build an empty pulse on the configured grid.
pub fn build_pulse(grid: &GridConfig) -> Result<Pulse> {
    let ft = match grid.spacing {
        SpacingSpec::Range { time_range } => {
            FourierTransform::from_time_range(grid.points, time_range[0], time_range[1])
        }
        SpacingSpec::Step { dt } => FourierTransform::new(grid.points, dt),
    }
    .context("Invalid grid configuration")?;
    let ft = ft.with_backend(create_backend(&grid.backend)?);
    let pulse = Pulse::new(ft, grid.central_wavelength).context("Invalid central wavelength")?;
    Ok(pulse)
}

/// Run a full job from a parsed configuration.
pub fn run_job(job: &JobConfig) -> Result<JobOutput> {
    let mut pulse = build_pulse(&job.grid)?;
    println!(
        "Grid: {} points, t = [{:.3e}, {:.3e}] s, λ0 = {:.1} nm",
        pulse.n(),
        pulse.t()[0],
        pulse.t()[pulse.n() - 1],
        pulse.wl0() * 1e9
    );

    let params = normal_pulse(&mut pulse, &job.pulse).context("Normal pulse synthesis failed")?;
    println!(
        "Normal pulse: σ_ω = {:.4e} rad/s, σ_t = {:.4e} s (grid limit {:.4e} s, edge value {:.3e})",
        params.spectral_width, params.temporal_width, params.max_temporal_width, params.edge_value
    );

    let dispersion = match &job.stretcher {
        Some(geometry) => {
            let pair = GratingPair::new(*geometry);
            let coefficients = pair.stretch(&mut pulse).with_context(|| {
                format!(
                    "Stretch failed for θ={} rad, {} lines/mm, L={} m",
                    geometry.theta, geometry.groove_density, geometry.separation
                )
            })?;
            println!(
                "Stretcher: GVD = {:.4e} s², TOD = {:.4e} s³",
                coefficients.gvd, coefficients.tod
            );
            Some(coefficients)
        }
        None => None,
    };

    Ok(JobOutput {
        pulse,
        normal_pulse: params,
        dispersion,
    })
}

/// Check a job without synthesising anything: the grid must build, the
/// normal pulse must fit, and the stretcher geometry must be valid at `wl0`.
pub fn validate_job(job: &JobConfig) -> Result<NormalPulseParameters> {
    let pulse = build_pulse(&job.grid)?;
    let params = normal_pulse_parameters(&pulse, &job.pulse)?;
    if !params.feasible {
        anyhow::bail!(
            "Normal pulse infeasible on this grid: σ_t = {:.4e} s exceeds limit {:.4e} s",
            params.temporal_width,
            params.max_temporal_width
        );
    }
    if let Some(geometry) = &job.stretcher {
        GratingPair::new(*geometry)
            .dispersion(pulse.wl0())
            .context("Invalid stretcher geometry")?;
    }
    Ok(params)
}

/// Human-readable GVD/TOD report for a grating pair at `wavelength` (m).
pub fn dispersion_report(geometry: GratingGeometry, wavelength: f64) -> Result<String> {
    let c = GratingPair::new(geometry).dispersion(wavelength)?;
    Ok(format!(
        "λ0  = {:.1} nm\nGVD = {:.6e} s²  ({:.1} fs²)\nTOD = {:.6e} s³  ({:.1} fs³)",
        wavelength * 1e9,
        c.gvd,
        c.gvd * 1e30,
        c.tod,
        c.tod * 1e45
    ))
}

/// Write the temporal envelope (and stretched envelope, if any) to CSV.
pub fn write_pulse_csv(pulse: &Pulse, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Chirp — Temporal Envelope")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# points: {}", pulse.n())?;
    writeln!(file, "# central_wavelength_m: {:.6e}", pulse.wl0())?;
    writeln!(file, "#")?;

    match pulse.stretched_intensity() {
        Some(stretched) => {
            writeln!(file, "t_s,abs_field,abs_stretched")?;
            for ((t, e), s) in pulse
                .t()
                .iter()
                .zip(pulse.temporal_intensity().iter())
                .zip(stretched.iter())
            {
                writeln!(file, "{:.6e},{:.6e},{:.6e}", t, e.norm(), s.norm())?;
            }
        }
        None => {
            writeln!(file, "t_s,abs_field")?;
            for (t, e) in pulse.t().iter().zip(pulse.temporal_intensity().iter()) {
                writeln!(file, "{:.6e},{:.6e}", t, e.norm())?;
            }
        }
    }

    println!("Temporal envelope written to: {}", path.display());
    Ok(())
}

/// Write the spectral amplitude and phase to CSV.
pub fn write_spectrum_csv(pulse: &Pulse, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Chirp — Spectrum")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "w_rad_per_s,wavelength_m,abs_spectrum,phase_rad")?;
    for ((w, wl), s) in pulse
        .w()
        .iter()
        .zip(pulse.wl().iter())
        .zip(pulse.spectral_intensity().iter())
    {
        writeln!(file, "{:.6e},{:.6e},{:.6e},{:.6}", w, wl, s.norm(), s.arg())?;
    }

    println!("Spectrum written to: {}", path.display());
    Ok(())
}

/// Write the job summary to a JSON file.
pub fn write_summary_json(summary: &JobSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Summary (JSON) written to: {}", path.display());
    Ok(())
}

/// Create a compute backend based on the user's preference string.
///
/// - `"cpu"` — Rayon thread pool.
/// - `"serial"` — single thread.
fn create_backend(preference: &str) -> Result<Arc<dyn ComputeBackend>> {
    let backend: Arc<dyn ComputeBackend> = match preference {
        "cpu" => Arc::new(CpuBackend::new()),
        "serial" => Arc::new(SerialBackend),
        other => anyhow::bail!("Unknown backend '{}'. Valid backends: cpu, serial", other),
    };
    log::info!("Backend: {}", backend.device_info().name);
    Ok(backend)
}
