//! Fixture error taxonomy

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::ports::{CreateError, MigrateError};

/// Errors raised by fixture discovery, loading, and teardown.
///
/// Filesystem and parse errors are never swallowed: they surface from the
/// load call (and therefore from registration when loading on startup).
/// Record-creation errors are collected per fixture and only become fatal
/// in strict mode; migration errors are logged and never fatal.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixtures directory or a fixture file could not be read
    #[error("failed to read fixtures at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture file is not a valid JSON array of record objects
    #[error("fixture '{fixture}' is not a valid JSON record array: {source}")]
    Parse {
        fixture: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model layer rejected a fixture's records
    #[error(transparent)]
    RecordCreation(#[from] CreateError),

    /// A datastore re-migration failed
    #[error(transparent)]
    Migration(#[from] MigrateError),

    /// One or more fixtures failed to load (strict mode only)
    #[error(transparent)]
    Setup(#[from] SetupErrors),
}

impl FixtureError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixtureError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn parse(fixture: impl Into<String>, source: serde_json::Error) -> Self {
        FixtureError::Parse {
            fixture: fixture.into(),
            source,
        }
    }

    /// True for errors that must abort the calling context regardless of
    /// the `error_on_setup_failure` setting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FixtureError::Filesystem { .. } | FixtureError::Parse { .. }
        )
    }
}

/// The per-fixture errors collected by one setup pass.
///
/// Keyed by fixture name; insertion order is not preserved because callers
/// only ever inspect membership and render the set as a whole.
#[derive(Debug, Default)]
pub struct SetupErrors(pub BTreeMap<String, FixtureError>);

impl SetupErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, fixture: impl Into<String>, error: FixtureError) {
        self.0.insert(fixture.into(), error);
    }

    /// The names of the fixtures that failed, in sorted order.
    pub fn failed_fixtures(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl fmt::Display for SetupErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fixture(s) failed to load: {}",
            self.0.len(),
            self.failed_fixtures().join(", ")
        )
    }
}

impl std::error::Error for SetupErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_errors_are_fatal() {
        let err = FixtureError::filesystem(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn record_creation_errors_are_not_fatal() {
        let err = FixtureError::from(CreateError::new("Item", "no such model"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn setup_errors_render_failed_fixture_names() {
        let mut errors = SetupErrors::default();
        errors.insert("Item2", CreateError::new("Item2", "boom").into());
        errors.insert("Item", CreateError::new("Item", "boom").into());

        let rendered = errors.to_string();
        assert!(rendered.starts_with("2 fixture(s) failed to load"));
        assert_eq!(errors.failed_fixtures(), vec!["Item", "Item2"]);
    }
}
