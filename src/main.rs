//! Gatehouse - authentication service
//!
//! Registers accounts, exchanges credentials for access tokens and revokes
//! tokens on logout.

use gatehouse::{api, auth, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging system based on configuration
    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Configuration loaded successfully");
    info!("Starting Gatehouse v{}", gatehouse::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        path = ?config.database.path,
        "Database configuration"
    );

    // Initialize database (migrations run on open)
    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Database initialized successfully");

    let store = Arc::new(db::SqliteCredentialStore::new(db));

    let revocations = Arc::new(auth::MemoryRevocationCache::new());
    let _sweeper =
        revocations.spawn_sweeper(Duration::from_secs(config.revocation.sweep_interval));

    let secret = auth::SigningSecret::new(config.security.jwt_secret.clone());
    let auth_service = Arc::new(auth::AuthService::new(
        store,
        revocations,
        auth::TokenIssuer::new(&secret),
    ));

    // Initialize API server
    info!("Initializing HTTP server...");
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(&config, auth_service)?;

    info!("Gatehouse initialized successfully");
    info!(url = %server_url, "Server ready - starting to serve requests");

    // Start serving (this will block until shutdown signal)
    server.serve().await?;

    Ok(())
}
