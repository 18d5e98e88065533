//! TOML configuration deserialisation for pulse-shaping jobs.

use chirp_core::grating::GratingGeometry;
use chirp_core::normal_pulse::NormalPulseOptions;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    #[serde(default)]
    pub pulse: NormalPulseOptions,
    /// Grating-pair stretcher. The pulse is not stretched if absent.
    #[serde(default)]
    pub stretcher: Option<GratingGeometry>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Time/frequency grid from TOML.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Number of samples.
    pub points: usize,
    #[serde(flatten)]
    pub spacing: SpacingSpec,
    /// Central wavelength (m).
    #[serde(default = "default_central_wavelength")]
    pub central_wavelength: f64,
    /// Compute backend: "cpu" or "serial". Default: "cpu".
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_central_wavelength() -> f64 {
    800e-9
}

fn default_backend() -> String {
    "cpu".into()
}

/// Time sampling: either an explicit range or a step.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SpacingSpec {
    Range { time_range: [f64; 2] },
    Step { dt: f64 },
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to also save a JSON summary (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

/// Parse a TOML job configuration.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}
