//! cnic-lookup CLI
//!
//! Runs lookups from the command line or serves them over HTTP.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cnic_lookup::{error::Result, models::Config, pipeline::LookupPipeline};

/// cnic-lookup - Mobile number / CNIC lookup service
#[derive(Parser, Debug)]
#[command(
    name = "cnic-lookup",
    version,
    about = "Mobile number and CNIC lookup service"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one or more mobile numbers or CNICs
    Lookup {
        /// Values to look up (92XXXXXXXXXX or 13-digit CNIC)
        #[arg(required = true)]
        queries: Vec<String>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Serve the lookup API over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Bind host (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (default from config or PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load_if_present(&cli.config)?;
    init_logging(cli.verbose, &config.logging.level);
    config.apply_env_overrides();

    log::debug!("Configuration source: {}", cli.config.display());

    match cli.command {
        Command::Lookup { queries, pretty } => {
            config.validate()?;
            let pipeline = LookupPipeline::from_config(&config)?;

            let outcomes = pipeline.lookup_many(queries.as_slice()).await;
            let mut failures = 0;
            for outcome in &outcomes {
                println!("{}", outcome.to_json(pretty)?);
                if !outcome.is_success() {
                    failures += 1;
                }
            }

            if failures > 0 {
                log::warn!("{} of {} lookups failed", failures, outcomes.len());
                return Ok(ExitCode::FAILURE);
            }
        }

        #[cfg(feature = "server")]
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            log::info!(
                "Starting Pakistan Number/CNIC Info API (live) | {}",
                config.attribution.notice()
            );
            let pipeline = LookupPipeline::from_config(&config)?;
            cnic_lookup::server::serve(&config.server, pipeline).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (upstream {})", config.upstream.endpoint()?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
