//! EMRView - Interactive EMR Record Analysis Console
//!
//! A CLI tool that fetches patient records from a remote endpoint,
//! normalizes them, filters them by age range, and generates summary
//! statistics, chart artifacts, and a text report from a numbered menu.
//!
//! Exit codes:
//!   0 - Clean exit from the menu
//!   1 - Startup or I/O error (bad arguments, unreadable input, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod ingest;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use session::Session;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("EMRView v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the interactive session
    match run_session(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Session failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .emrview.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".emrview.toml");

    if path.exists() {
        eprintln!("⚠️  .emrview.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .emrview.toml")?;

    println!("✅ Created .emrview.toml with default settings.");
    println!("   Edit it to customize the endpoint, output directory, and chart size.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Set up the session and run the menu loop to completion.
async fn run_session(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    info!("Record endpoint: {}", config.ingest.endpoint);
    info!("Artifact directory: {}", config.report.output_dir);

    std::fs::create_dir_all(&config.report.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.report.output_dir
        )
    })?;

    let mut session = Session::new(&config, !args.quiet);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    session.run(&mut input).await
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .emrview.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
