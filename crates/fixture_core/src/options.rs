//! Fixture orchestrator configuration
//!
//! Options are merged over defaults builder-style:
//!
//! ```rust
//! use fixture_core::FixtureOptions;
//!
//! let options = FixtureOptions::default()
//!     .load_on_startup(true)
//!     .environments(["test", "ci"])
//!     .fixtures_path("tests/fixtures/");
//! ```

use serde::Deserialize;

/// The process environments in which the orchestrator is allowed to run.
///
/// A single name requires an exact match; a list is a membership test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Environments {
    One(String),
    Many(Vec<String>),
}

impl Environments {
    /// Whether the given environment name is permitted.
    pub fn matches(&self, environment: &str) -> bool {
        match self {
            Environments::One(name) => name == environment,
            Environments::Many(names) => names.iter().any(|name| name == environment),
        }
    }
}

impl Default for Environments {
    fn default() -> Self {
        Environments::One("test".to_string())
    }
}

impl From<&str> for Environments {
    fn from(name: &str) -> Self {
        Environments::One(name.to_string())
    }
}

impl From<String> for Environments {
    fn from(name: String) -> Self {
        Environments::One(name)
    }
}

impl<const N: usize> From<[&str; N]> for Environments {
    fn from(names: [&str; N]) -> Self {
        Environments::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<String>> for Environments {
    fn from(names: Vec<String>) -> Self {
        Environments::Many(names)
    }
}

/// Configuration for one fixture orchestrator registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixtureOptions {
    /// Run a full load once at registration time
    pub load_on_startup: bool,
    /// Treat per-fixture load failures as errors instead of logging them
    pub error_on_setup_failure: bool,
    /// Environments in which the orchestrator activates at all
    pub environments: Environments,
    /// Fixture directory, relative to the application root. A leading
    /// separator is treated as relative to the root, not the filesystem root.
    pub fixtures_path: String,
    /// Restrict teardown to the named datastore
    pub datasource: Option<String>,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            load_on_startup: false,
            error_on_setup_failure: false,
            environments: Environments::default(),
            fixtures_path: "/server/test-fixtures/".to_string(),
            datasource: None,
        }
    }
}

impl FixtureOptions {
    pub fn load_on_startup(mut self, enabled: bool) -> Self {
        self.load_on_startup = enabled;
        self
    }

    pub fn error_on_setup_failure(mut self, enabled: bool) -> Self {
        self.error_on_setup_failure = enabled;
        self
    }

    pub fn environments(mut self, environments: impl Into<Environments>) -> Self {
        self.environments = environments.into();
        self
    }

    pub fn fixtures_path(mut self, path: impl Into<String>) -> Self {
        self.fixtures_path = path.into();
        self
    }

    pub fn datasource(mut self, name: impl Into<String>) -> Self {
        self.datasource = Some(name.into());
        self
    }
}
