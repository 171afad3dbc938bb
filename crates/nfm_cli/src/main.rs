//! Field Mapper CLI
//!
//! Detection JSON → field-coordinate play JSON

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "nfm")]
#[command(about = "Map football detections onto field coordinates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Map detection files in parallel, one output file per input
    Process {
        /// Detection JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// YAML config file (overrides NFM_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Drop near-duplicate detections before mapping
        #[arg(long, default_value = "false")]
        dedup: bool,
    },

    /// Map one detection file, optionally pinning line or scale
    Map {
        /// Detection JSON file
        file: PathBuf,

        /// Line of scrimmage pixel x
        #[arg(long)]
        los: Option<f64>,

        /// Pixels per yard
        #[arg(long)]
        pixels_per_yard: Option<f64>,

        /// Field center pixel y
        #[arg(long)]
        field_center_y: Option<f64>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// YAML config file (overrides NFM_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Drop near-duplicate detections before mapping
        #[arg(long, default_value = "false")]
        dedup: bool,
    },

    /// Print the position taxonomy
    Positions,

    /// Print the JSON schema of the mapped play
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            files,
            out,
            config,
            dedup,
        } => {
            let config = nfm_cli::load_config(config.as_deref(), dedup)?;
            let outcomes = nfm_cli::process_files(&files, out.as_deref(), &config);

            let mut failed = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(path) => println!("{} -> {}", outcome.input.display(), path.display()),
                    Err(e) => {
                        failed += 1;
                        eprintln!("{}: {e:#}", outcome.input.display());
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} files failed", outcomes.len());
            }
        }

        Commands::Map {
            file,
            los,
            pixels_per_yard,
            field_center_y,
            out,
            config,
            dedup,
        } => {
            let config = nfm_cli::load_config(config.as_deref(), dedup)?;
            let overrides = nfm_core::Overrides {
                line_of_scrimmage_x: los,
                pixels_per_yard,
                field_center_y,
            };
            let mapper = nfm_core::FieldMapper::new(config);
            let envelope = nfm_cli::map_file(&file, &mapper, &overrides)?;

            match out {
                Some(path) => {
                    nfm_cli::write_envelope(&envelope, &path)?;
                    println!("{} -> {}", file.display(), path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&envelope)?),
            }
        }

        Commands::Positions => println!("{}", nfm_cli::positions_json()?),

        Commands::Schema => println!("{}", nfm_cli::play_schema()?),
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("nfm CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
