//! HTTP API Layer
//!
//! Exposes the fixture orchestrator over HTTP using Axum:
//!
//! - `GET /fixtures/setup`: load fixtures (optional `opts` name subset)
//! - `GET /fixtures/teardown`: wipe fixture models (same `opts` support)
//! - `GET /health`, `GET /health/ready`: liveness and fixture-source probes
//!
//! The fixture routes only exist when registration activated; a skipped
//! registration (environment mismatch) produces a router without them.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixture_core::{register, FixtureOptions, HostApp};
//! use interface_api::create_router;
//!
//! let fixtures = register(&host, &FixtureOptions::default()).await?;
//! let app = create_router(fixtures);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use fixture_core::Fixtures;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub fixtures: Fixtures,
}

/// Creates the API router.
///
/// With `Some(fixtures)` the `/fixtures` routes and the readiness probe are
/// mounted; with `None` (registration skipped) only liveness remains.
pub fn create_router(fixtures: Option<Fixtures>) -> Router {
    match fixtures {
        Some(fixtures) => {
            let fixture_routes = Router::new()
                .route("/setup", get(handlers::fixtures::setup))
                .route("/teardown", get(handlers::fixtures::teardown));

            Router::new()
                .route("/health", get(handlers::health::health_check))
                .route("/health/ready", get(handlers::health::readiness_check))
                .nest("/fixtures", fixture_routes)
                .layer(TraceLayer::new_for_http())
                .with_state(AppState { fixtures })
        }
        None => Router::new()
            .route("/health", get(handlers::health::health_check))
            .layer(TraceLayer::new_for_http()),
    }
}
