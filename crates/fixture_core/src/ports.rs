//! Port traits for the host's model and datastore abstractions
//!
//! The orchestrator never talks to a concrete connector. It drives the two
//! traits below, and adapters (in-memory, PostgreSQL) implement them. This is
//! the seam that lets the whole load/teardown cycle run against an in-memory
//! store in tests and a real database in integration environments.

use async_trait::async_trait;
use thiserror::Error;

use crate::Record;

/// The model layer rejected a bulk-create for a fixture.
#[derive(Debug, Error)]
#[error("cannot create records for model '{model}': {message}")]
pub struct CreateError {
    pub model: String,
    pub message: String,
}

impl CreateError {
    pub fn new(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            message: message.into(),
        }
    }
}

/// A schema re-migration failed on one datastore.
///
/// `model` is `"*"` when the whole datastore was being re-migrated.
#[derive(Debug, Error)]
#[error("automigrate of '{model}' failed on datasource '{datasource}': {message}")]
pub struct MigrateError {
    pub datasource: String,
    pub model: String,
    pub message: String,
}

impl MigrateError {
    pub fn new(
        datasource: impl Into<String>,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            datasource: datasource.into(),
            model: model.into(),
            message: message.into(),
        }
    }
}

/// The host's model registry: named models accepting bulk record creation.
///
/// `create_records` is additive. Callers get no de-duplication and no
/// rollback; a failure may leave earlier records of the same batch in place.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Names of the models the host has registered.
    fn model_names(&self) -> Vec<String>;

    /// Insert the given records into the named model.
    async fn create_records(&self, model: &str, records: &[Record]) -> Result<(), CreateError>;
}

/// One named datastore connection capable of schema re-migration.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Drop and recreate the backing schema of one model.
    ///
    /// Model names are case-sensitive; a name that does not correspond to a
    /// real model is an error the caller is expected to tolerate.
    async fn automigrate(&self, model: &str) -> Result<(), MigrateError>;

    /// Drop and recreate the backing schema of every model on this datastore.
    async fn automigrate_all(&self) -> Result<(), MigrateError>;
}
