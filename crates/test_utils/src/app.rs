//! Pre-wired test host applications
//!
//! A `TestApp` bundles an in-memory datastore with `Item`/`Item2` models, a
//! temporary application root holding the canonical fixture files, and a
//! `HostApp` ready to hand to `register`.

use std::sync::Arc;

use tempfile::TempDir;

use fixture_core::HostApp;
use infra_memory::MemoryDataSource;

use crate::fixtures::{invalid_app_root, standard_app_root};

/// An in-memory host application with fixtures on disk.
pub struct TestApp {
    pub datasource: Arc<MemoryDataSource>,
    pub host: HostApp,
    /// Keeps the temporary application root alive for the test's duration.
    _app_root: TempDir,
}

impl TestApp {
    /// Host with `Item`/`Item2` models and the canonical fixture files,
    /// environment set to `"test"`.
    pub fn new() -> Self {
        Self::from_root(standard_app_root())
    }

    /// Host whose only fixture names a model that was never registered, so
    /// setup always reports a record-creation failure.
    pub fn with_invalid_fixtures() -> Self {
        Self::from_root(invalid_app_root())
    }

    fn from_root(app_root: TempDir) -> Self {
        let datasource = Arc::new(MemoryDataSource::new("db"));
        datasource.define_model_with_required("Item", &["requiredStuff"]);
        datasource.define_model_with_required("Item2", &["requiredStuff"]);

        let host = HostApp::new(datasource.clone(), vec![datasource.clone()])
            .app_root(app_root.path())
            .environment("test");

        Self {
            datasource,
            host,
            _app_root: app_root,
        }
    }

    /// The temporary application root the fixture files live under.
    pub fn app_root(&self) -> &std::path::Path {
        self._app_root.path()
    }

    /// Record count for a model; panics on unknown models to keep test
    /// assertions short.
    pub fn count(&self, model: &str) -> usize {
        self.datasource
            .count(model)
            .unwrap_or_else(|| panic!("model '{model}' is not defined on the test app"))
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
