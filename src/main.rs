use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use swissgit::cli::CliArgs;
use tracing::{debug, info};

/// Load `.env` from the executable's directory; a missing file is fine
fn load_dotenv() {
    let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    else {
        return;
    };

    match dotenvy::from_path(dir.join(".env")) {
        Ok(()) => debug!("Loaded environment from {}", dir.join(".env").display()),
        Err(e) if e.not_found() => {}
        Err(e) => debug!("Could not load .env: {}", e),
    }
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so they never mix with result lines
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();

    let args = CliArgs::parse();
    info!("Starting swissgit");
    swissgit::app::run(args)
}
