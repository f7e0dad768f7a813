// askdb server entrypoint
//!
//! Configuration loading and logging happen here; everything else
//! lives in dedicated modules so this file remains a thin orchestrator.

mod lifecycle;
mod logging;

use anyhow::Result;
use askdb_configs::ServerConfig;
use lifecycle::{bootstrap, run};
use log::info;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration (fall back to defaults when the file is missing)
    let config_path = "config.toml";
    let config = if std::path::Path::new(config_path).exists() {
        match ServerConfig::from_file(config_path) {
            Ok(cfg) => {
                eprintln!("Loaded config from: {}", config_path);
                cfg
            }
            Err(e) => {
                eprintln!("FATAL: Failed to load {}: {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        let mut cfg = ServerConfig::default();
        cfg.finalize()?;
        eprintln!("No {} found, using defaults", config_path);
        cfg
    };

    // Logging before any other side effects
    logging::init_logging(&config.logging.level, &config.logging.format)?;

    info!("askdb server v{}", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let pipeline = bootstrap(&config)?;

    run(&config, pipeline).await
}
