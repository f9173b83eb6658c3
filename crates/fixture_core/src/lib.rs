//! Fixture Core - Orchestration of JSON test fixtures
//!
//! This crate provides the fixture orchestrator used to seed and wipe
//! datastore-backed models during testing:
//! - Discovery and lazy caching of `<ModelName>.json` fixture files
//! - Concurrent loading of fixture records into named models
//! - Teardown via schema re-migration across every configured datastore
//! - Environment-gated registration producing a reusable handle

pub mod error;
pub mod host;
pub mod options;
pub mod orchestrator;
pub mod ports;
pub mod source;

pub use error::{FixtureError, SetupErrors};
pub use host::{register, Fixtures, HostApp};
pub use options::{Environments, FixtureOptions};
pub use orchestrator::{FixtureOrchestrator, SetupReport};
pub use ports::{CreateError, DataSource, MigrateError, ModelRegistry};
pub use source::{DirectorySource, FixtureSource, MemorySource};

/// A single fixture record: one JSON object destined for a model.
pub type Record = serde_json::Map<String, serde_json::Value>;
