//! Fixture API server binary
//!
//! Serves the fixture setup/teardown routes over an in-memory datastore,
//! deriving one model per fixture file found under the configured path.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin fixtures-api
//!
//! # Run with environment variables
//! API_PORT=3000 APP_ENV=test FIXTURES_FIXTURES_PATH=tests/fixtures/ cargo run --bin fixtures-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_ENVIRONMENT` / `APP_ENV` - Environment name the registration is gated on
//! * `FIXTURES_LOAD_ON_STARTUP` - Load all fixtures at boot (default: false)
//! * `FIXTURES_ERROR_ON_SETUP_FAILURE` - Fail setup on partial load failures
//! * `FIXTURES_FIXTURES_PATH` - Fixture directory relative to the working directory
//! * `FIXTURES_ENVIRONMENTS` - Environment name loading is permitted in (default: test)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fixture_core::{register, DirectorySource, FixtureSource, HostApp};
use infra_memory::MemoryDataSource;
use interface_api::config::{fixture_options_from_env, ApiConfig};
use interface_api::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    let options = fixture_options_from_env().unwrap_or_default();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        fixtures_path = %options.fixtures_path,
        "Starting fixture API server"
    );

    let app_root = std::env::current_dir()?;
    let datasource = Arc::new(MemoryDataSource::new("db"));

    // One schema-light model per fixture file; a real host would register
    // its own models before handing them to the orchestrator.
    let source = DirectorySource::new(&app_root, &options.fixtures_path);
    match source.discover() {
        Ok(names) => {
            for name in &names {
                datasource.define_model(name);
            }
            tracing::info!(count = names.len(), "models derived from fixture files");
        }
        Err(err) => {
            tracing::warn!(error = %err, "fixture directory not readable, no models defined");
        }
    }

    let mut host = HostApp::new(datasource.clone(), vec![datasource.clone()])
        .app_root(&app_root);
    host.environment = config.environment.clone();

    let fixtures = register(&host, &options).await?;
    if fixtures.is_none() {
        tracing::info!("fixture routes disabled for this environment");
    }

    let app = create_router(fixtures);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
