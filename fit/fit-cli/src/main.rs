//! fitscan: compare a body scan with a garment scan and draft the pieces
//! that would make the garment fit.
//!
//! # Commands
//!
//! - `fitscan inspect <MESH>` - mesh statistics
//! - `fitscan body <MESH>` - landmarks and measurements
//! - `fitscan garment <MESH>` - garment type and measurements
//! - `fitscan fit <BODY> <GARMENT>` - fit issues and recommendations
//! - `fitscan workflow <BODY> <GARMENT>` - everything, with pattern drawings
//! - `fitscan health` - which stages are available
//!
//! Logging goes to stderr; `RUST_LOG` overrides `-v`.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use body_model::MovementProfile;
use clap::{ArgAction, Parser, Subcommand};
use fit_pipeline::{
    Capabilities, Feature, FitPipeline, MeshBackend, PassthroughBackend, PipelineConfig,
};
use pattern_gen::FabricType;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Body and garment scan fitting
#[derive(Parser, Debug)]
#[command(name = "fitscan")]
#[command(about = "Compare a body scan with a garment scan and draft alteration pieces", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Pipeline configuration (JSON); absent fields keep their defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Movement profile, overriding the configuration
    #[arg(long, global = true)]
    profile: Option<MovementProfile>,

    /// Fabric of the new pieces, overriding the configuration
    #[arg(long, global = true)]
    fabric: Option<FabricType>,

    /// Garment type, overriding the configuration and detection
    #[arg(long = "type", global = true, value_name = "TYPE")]
    garment_type: Option<String>,

    /// Use scans as loaded: no cleanup, orientation or alignment
    #[arg(long, global = true)]
    passthrough: bool,

    /// Switch a stage off (repeatable), e.g. pattern_generation
    #[arg(long, global = true, value_name = "FEATURE")]
    without: Vec<Feature>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show vertex and face counts, bounds and detected unit of a mesh
    Inspect {
        /// STL, PLY or OBJ file
        mesh: PathBuf,
    },

    /// Detect landmarks and take measurements of a body scan
    Body {
        /// STL, PLY or OBJ file
        mesh: PathBuf,
    },

    /// Classify and measure a garment scan
    Garment {
        /// STL, PLY or OBJ file
        mesh: PathBuf,
    },

    /// Compare a body with a garment
    Fit {
        /// Body scan
        body: PathBuf,
        /// Garment scan
        garment: PathBuf,
    },

    /// Run every stage and write the report and pattern drawings
    Workflow {
        /// Body scan
        body: PathBuf,
        /// Garment scan
        garment: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "fitscan-out")]
        output: PathBuf,
    },

    /// List the available stages
    Health,
}

impl Cli {
    fn settings(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("failed to read configuration {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(profile) = self.profile {
            config = config.with_profile(profile);
        }
        if let Some(fabric) = self.fabric {
            config = config.with_fabric(fabric);
        }
        if let Some(name) = &self.garment_type {
            config = config.with_garment_type(name.clone());
        }
        Ok(config)
    }

    fn capabilities(&self) -> Capabilities {
        self.without
            .iter()
            .fold(Capabilities::full(), |caps, feature| caps.without(*feature))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch<B: MeshBackend>(
    pipeline: &FitPipeline<B>,
    command: Commands,
    json: bool,
) -> Result<()> {
    debug!(backend = pipeline.backend().name(), ?command, "Dispatching");
    match command {
        Commands::Inspect { mesh } => commands::inspect(&mesh, json),
        Commands::Body { mesh } => commands::body(pipeline, &mesh, json),
        Commands::Garment { mesh } => commands::garment(pipeline, &mesh, json),
        Commands::Fit { body, garment } => commands::fit(pipeline, &body, &garment, json),
        Commands::Workflow {
            body,
            garment,
            output,
        } => commands::workflow(pipeline, &body, &garment, &output, json),
        Commands::Health => commands::health(pipeline, json),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.settings()?;
    let capabilities = cli.capabilities();
    if cli.passthrough {
        let pipeline = FitPipeline::with_backend(PassthroughBackend, config)
            .with_capabilities(&capabilities);
        dispatch(&pipeline, cli.command, cli.json)
    } else {
        let pipeline = FitPipeline::new(config).with_capabilities(&capabilities);
        dispatch(&pipeline, cli.command, cli.json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "fitscan",
            "workflow",
            "body.ply",
            "garment.obj",
            "--fabric",
            "knit",
            "--without",
            "pattern-generation",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.fabric, Some(FabricType::Knit));
        assert!(!cli.capabilities().has(Feature::PatternGeneration));
        assert!(matches!(
            cli.command,
            Commands::Workflow { ref output, .. } if output == &PathBuf::from("fitscan-out")
        ));
    }

    #[test]
    fn overrides_apply_on_top_of_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        std::fs::write(&path, r#"{"fabric": "denim", "garment_type": "shirt"}"#).unwrap();
        let cli = Cli::try_parse_from([
            "fitscan",
            "--config",
            path.to_str().unwrap(),
            "--profile",
            "default",
            "health",
        ])
        .unwrap();
        let config = cli.settings().unwrap();
        assert_eq!(config.fabric, FabricType::Denim);
        assert_eq!(config.profile, MovementProfile::Default);
        assert_eq!(config.garment_type.as_deref(), Some("shirt"));
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(Cli::try_parse_from(["fitscan", "--fabric", "silk", "health"]).is_err());
        assert!(Cli::try_parse_from(["fitscan", "--without", "gpu", "health"]).is_err());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::try_parse_from(["fitscan", "--config", "/nonexistent/fit.json", "health"])
            .unwrap();
        let err = cli.settings().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fit.json"));
    }
}
