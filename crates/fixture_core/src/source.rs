//! Fixture source collaborators
//!
//! Discovery and parsing go through the [`FixtureSource`] trait so the
//! orchestrator can be exercised against an in-memory source in tests while
//! production registrations read a real directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::FixtureError;
use crate::Record;

/// Supplies fixture names and parsed fixture content.
pub trait FixtureSource: Send + Sync {
    /// The base names of every available fixture, in a stable order.
    fn discover(&self) -> Result<Vec<String>, FixtureError>;

    /// Read and parse one fixture by base name.
    fn read(&self, name: &str) -> Result<Vec<Record>, FixtureError>;
}

/// A directory of `<ModelName>.json` files (non-recursive).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Resolves `fixtures_path` against the application root.
    ///
    /// A leading separator on `fixtures_path` means "relative to the root",
    /// so it is trimmed before joining; otherwise `Path::join` would discard
    /// the root entirely.
    pub fn new(app_root: &Path, fixtures_path: &str) -> Self {
        let relative = fixtures_path.trim_start_matches(['/', '\\']);
        Self {
            dir: app_root.join(relative),
        }
    }

    /// The resolved fixture directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FixtureSource for DirectorySource {
    fn discover(&self) -> Result<Vec<String>, FixtureError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|err| FixtureError::filesystem(&self.dir, err))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| FixtureError::filesystem(&self.dir, err))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }

        // read_dir order is platform-dependent; sort for a stable registry
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<Record>, FixtureError> {
        let path = self.dir.join(format!("{name}.json"));
        let content = std::fs::read_to_string(&path)
            .map_err(|err| FixtureError::filesystem(&path, err))?;
        serde_json::from_str(&content).map_err(|err| FixtureError::parse(name, err))
    }
}

/// An in-memory fixture source holding raw JSON documents.
///
/// Content is stored unparsed so tests can feed malformed documents through
/// the same parse path the directory source uses.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixture with the given raw JSON content.
    pub fn with_fixture(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    /// Adds a fixture from already-built records.
    pub fn with_records(self, name: impl Into<String>, records: &[Record]) -> Self {
        let content = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
        self.with_fixture(name, content)
    }
}

impl FixtureSource for MemorySource {
    fn discover(&self) -> Result<Vec<String>, FixtureError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<Record>, FixtureError> {
        let content = self.files.get(name).ok_or_else(|| {
            FixtureError::filesystem(
                format!("{name}.json"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such fixture"),
            )
        })?;
        serde_json::from_str(content).map_err(|err| FixtureError::parse(name, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn write_fixture(dir: &Path, file_name: &str, content: &str) {
        std::fs::write(dir.join(file_name), content).unwrap();
    }

    #[test]
    fn discover_lists_json_base_names_only() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "Item.json", "[]");
        write_fixture(dir.path(), "Item2.json", "[]");
        write_fixture(dir.path(), "README.md", "not a fixture");

        let source = DirectorySource::new(dir.path(), "");
        assert_eq!(source.discover().unwrap(), vec!["Item", "Item2"]);
    }

    #[test]
    fn discover_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path(), "does-not-exist/");

        let err = source.discover().unwrap_err();
        assert!(matches!(err, FixtureError::Filesystem { .. }));
    }

    #[test]
    fn leading_separator_is_relative_to_the_app_root() {
        let root = Path::new("/srv/app");
        let source = DirectorySource::new(root, "/server/test-fixtures/");
        assert_eq!(source.dir(), Path::new("/srv/app/server/test-fixtures"));
    }

    #[test]
    fn read_parses_a_record_array() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            "Item.json",
            r#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#,
        );

        let source = DirectorySource::new(dir.path(), "");
        let records = source.read("Item").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "a");
    }

    #[test]
    fn read_rejects_documents_that_are_not_record_arrays() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "Item.json", r#"{"id": 1}"#);

        let source = DirectorySource::new(dir.path(), "");
        let err = source.read("Item").unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }

    #[test]
    fn memory_source_feeds_malformed_content_through_the_parse_path() {
        let source = MemorySource::new().with_fixture("Broken", "[{not json");
        let err = source.read("Broken").unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }

    proptest! {
        /// Whatever mix of json and non-json files is on disk, discovery
        /// returns exactly the json base names, sorted.
        #[test]
        fn discover_strips_the_json_suffix(
            names in proptest::collection::btree_set("[A-Za-z][A-Za-z0-9_]{0,12}", 0..8),
            decoys in proptest::collection::btree_set("[A-Za-z][A-Za-z0-9_]{0,12}", 0..4),
        ) {
            let dir = tempfile::tempdir().unwrap();
            for name in &names {
                write_fixture(dir.path(), &format!("{name}.json"), "[]");
            }
            for decoy in &decoys {
                write_fixture(dir.path(), &format!("{decoy}.txt"), "decoy");
            }

            let source = DirectorySource::new(dir.path(), "");
            let discovered = source.discover().unwrap();
            let expected: Vec<String> = names.iter().cloned().collect();
            prop_assert_eq!(discovered, expected);
        }
    }
}
