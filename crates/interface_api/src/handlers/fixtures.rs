//! Fixture setup and teardown handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// Query parameters accepted by both fixture routes.
#[derive(Debug, Deserialize)]
pub struct FixtureParams {
    /// Comma-separated fixture names; absent means "all"
    pub opts: Option<String>,
}

impl FixtureParams {
    /// The selected fixture names, or `None` for the full default set.
    fn selection(&self) -> Option<Vec<String>> {
        let raw = self.opts.as_deref()?;
        let names: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FixtureResponse {
    pub fixtures: String,
}

impl FixtureResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            fixtures: message.to_string(),
        })
    }
}

/// `GET /fixtures/setup`: load all fixtures, or the `opts` subset.
///
/// Returns 200 with `{"fixtures": "setup complete"}` unless strict mode is
/// on and at least one fixture failed, in which case the body carries an
/// `error` field and the status is 500.
pub async fn setup(
    State(state): State<AppState>,
    Query(params): Query<FixtureParams>,
) -> Result<Json<FixtureResponse>, ApiError> {
    let result = match params.selection() {
        Some(names) => state.fixtures.setup_selected(&names).await,
        None => state.fixtures.setup_all().await,
    };
    result.map_err(ApiError::setup_failed)?;
    Ok(FixtureResponse::new("setup complete"))
}

/// `GET /fixtures/teardown`: wipe all fixture models, or the `opts` subset.
///
/// Always returns 200 with `{"fixtures": "teardown complete"}`.
pub async fn teardown(
    State(state): State<AppState>,
    Query(params): Query<FixtureParams>,
) -> Json<FixtureResponse> {
    match params.selection() {
        Some(names) => state.fixtures.teardown_selected(&names).await,
        None => state.fixtures.teardown_all().await,
    }
    FixtureResponse::new("teardown complete")
}
