use clap::{Parser, Subcommand};
use image_fingerprint_core::{logging, Config, ImageFingerprinter, LogLevel, ResizeFilter};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-fingerprint")]
#[command(about = "Compute binary perceptual fingerprints of images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fingerprint image files, or every image inside the given directories
    Hash {
        /// Image files or directories to fingerprint
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Resampling filter used for the 64x64 downscale
        #[arg(long)]
        filter: Option<ResizeFilter>,

        /// Maximum directory depth for scanning
        #[arg(long)]
        max_depth: Option<usize>,

        /// Number of worker threads (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Write each intermediate black and white image into this directory
        #[arg(long)]
        save_binarized: Option<PathBuf>,

        /// Write logs to a rotating file in this directory instead of stderr
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "image-fingerprint.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            paths,
            filter,
            max_depth,
            threads,
            save_binarized,
            log_dir,
            quiet,
            verbose,
            config,
        } => {
            let mut config = match config {
                Some(config_path) => Config::from_file(&config_path)?,
                None => Config::default(),
            };

            // Override config with command line arguments
            if let Some(filter) = filter {
                config.filter = filter;
            }
            if max_depth.is_some() {
                config.max_depth = max_depth;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if save_binarized.is_some() {
                config.binarized_dir = save_binarized;
            }
            if quiet {
                config.show_progress = false;
            }
            if verbose > 0 {
                config.log_level = match verbose {
                    1 => LogLevel::Debug,
                    _ => LogLevel::Trace,
                };
            }

            match &log_dir {
                Some(dir) => logging::init_logger(dir, config.log_level.into())?,
                None => env_logger::Builder::new()
                    .filter_level(config.log_level.into())
                    .parse_default_env()
                    .init(),
            }

            let fingerprinter = ImageFingerprinter::new(config)?;

            info!(
                "Starting image fingerprinting ({} filter)...",
                fingerprinter.hasher().filter()
            );
            let summary = fingerprinter.run(&paths)?;

            for result in &summary.fingerprints {
                println!("{}  {}", result.fingerprint, result.path.display());
            }

            if !summary.failed.is_empty() {
                for path in &summary.failed {
                    error!("Could not fingerprint {}", path.display());
                }
                anyhow::bail!(
                    "{} of {} images could not be fingerprinted",
                    summary.failed.len(),
                    summary.total()
                );
            }

            info!("Fingerprinting complete");
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
