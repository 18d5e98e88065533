//! Chirp command-line interface.
//!
//! Run pulse-shaping jobs from TOML configuration files:
//! ```sh
//! chirp-cli run job.toml
//! chirp-cli validate job.toml
//! chirp-cli dispersion --theta 0.3 --groove-density 600 --separation 0.1
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chirp_core::grating::GratingGeometry;

#[derive(Parser)]
#[command(name = "chirp-cli")]
#[command(about = "Chirp: grating-pair stretcher and normal-pulse synthesis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesise a normal pulse and optionally stretch it.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without writing any output.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Print GVD and TOD for a grating-pair geometry.
    Dispersion {
        /// Angle of incidence (radians).
        #[arg(long)]
        theta: f64,
        /// Groove density (lines/mm).
        #[arg(long)]
        groove_density: f64,
        /// Grating separation (m). Negative for a compressor.
        #[arg(long, allow_hyphen_values = true)]
        separation: f64,
        /// Central wavelength (m).
        #[arg(long, default_value_t = 800e-9)]
        wavelength: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Chirp Pulse Shaper");
            println!("==================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            runner::write_pulse_csv(&result.pulse, &out_dir.join("pulse.csv"))?;
            runner::write_spectrum_csv(&result.pulse, &out_dir.join("spectrum.csv"))?;

            if job.output.save_json {
                runner::write_summary_json(&result.summary(), &out_dir.join("summary.json"))?;
            }

            println!("Job complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate_job(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Dispersion {
            theta,
            groove_density,
            separation,
            wavelength,
        } => {
            let geometry = GratingGeometry {
                theta,
                groove_density,
                separation,
            };
            println!("{}", runner::dispersion_report(geometry, wavelength)?);
            Ok(())
        }
    }
}
