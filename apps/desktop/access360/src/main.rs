use access360::commands::session::{drain_notifications, submit_location};
use access360::error::Access360Error;
use access360::logger::initialize as LoggerInitialize;
use access360::state::AppState;

use access_core::config::AppConfig;
use access_core::orchestrator::Notification;
use access_core::report::AccessibilityReport;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info};
use serde::Serialize;

const APP_DIR_NAME: &str = "access360";

/// Rate a restaurant's wheelchair accessibility from street-level imagery.
#[derive(Debug, Parser)]
#[command(name = "access360", version, about)]
struct Args {
    /// Restaurant name, e.g. "Panda Express"
    #[arg(long)]
    name: String,

    /// Street address of the restaurant
    #[arg(long)]
    address: String,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Directory for access360.log (defaults to the platform data dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log at debug level regardless of build type
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    report: Option<&'a AccessibilityReport>,
    error: Option<&'a Access360Error>,
    notifications: &'a [Notification],
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| default_dir(dirs::data_local_dir(), "logs"));
    let level = args.verbose.then_some(LevelFilter::Debug);

    if let Err(e) = LoggerInitialize(&log_dir, level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    info!("Access 360 starting");
    info!("Log directory: {}", log_dir.display());

    let state = match build_state(&args) {
        Ok(state) => state,
        Err(e) => {
            error!("Startup failed: {e}");
            return print_output(None, Some(&e), &[]);
        }
    };

    let result = submit_location(&state, &args.name, &args.address).await;
    let notifications = drain_notifications(&state);

    match result {
        Ok(report) => print_output(Some(&report), None, &notifications),
        Err(e) => print_output(None, Some(&e), &notifications),
    }
}

fn build_state(args: &Args) -> Result<AppState, Access360Error> {
    let config_dir = args
        .config_dir
        .clone()
        .unwrap_or_else(|| default_dir(dirs::config_dir(), ""));
    info!("Config directory: {}", config_dir.display());

    let config = AppConfig::load_with_env(&config_dir).map_err(|e| Access360Error::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let state = AppState::from_config(&config)?;
    info!(
        "Session {} using backend {}",
        state.id(),
        config.backend.base_url
    );
    Ok(state)
}

/// `<platform dir>/access360/<leaf>`, or `./access360/<leaf>` when the
/// platform has no such directory.
fn default_dir(platform_dir: Option<PathBuf>, leaf: &str) -> PathBuf {
    let base = platform_dir.unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join(APP_DIR_NAME);
    if leaf.is_empty() { dir } else { dir.join(leaf) }
}

fn print_output(
    report: Option<&AccessibilityReport>,
    error: Option<&Access360Error>,
    notifications: &[Notification],
) -> ExitCode {
    let output = Output {
        report,
        error,
        notifications,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize output: {e}");
            return ExitCode::FAILURE;
        }
    }

    if error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
