use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use filedrop::web::handlers::AppState;
use filedrop::{Config, LocalDirectory, WebServer};

/// Directory holding the executable. Relative configured paths live here.
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> ExitCode {
    let base = install_dir();

    // Load configuration
    let config_path = base.join("config.toml");
    let mut config = if config_path.exists() {
        match Config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", config_path.display());
                eprintln!("Using default configuration.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = filedrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filedrop::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let timezone = match config.timezone() {
        Ok(timezone) => timezone,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let uploads_dir = Config::resolve_path(&base, &config.storage.uploads_dir);
    let dir = match LocalDirectory::open(&uploads_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to open uploads directory {}: {}", uploads_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Storing uploads in {}", dir.base_path().display());

    let public_dir = Config::resolve_path(&base, &config.storage.public_dir);
    let state = AppState::new(Arc::new(dir)).with_timezone(timezone);
    let server = WebServer::new(&config.server, &config.storage, state, public_dir);

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
