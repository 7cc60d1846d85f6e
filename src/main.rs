use std::time::Duration;

use tracing::{error, info};

use vidhub::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = vidhub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        vidhub::logging::init_console_only(&config.logging.level);
    }

    info!("VIDHUB - Session Authentication Service");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db.with_query_timeout(Duration::from_millis(config.database.query_timeout_ms)),
        Err(e) => {
            error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
    }

    db.close().await;
    info!("Shutdown complete");
}
