//! Pre-built test fixtures
//!
//! Canonical fixture record sets and helpers that materialize them as
//! `<ModelName>.json` files in a temporary application root.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use fixture_core::Record;

/// The fixture directory used when options carry the default path.
pub const DEFAULT_FIXTURES_DIR: &str = "server/test-fixtures";

fn records(value: serde_json::Value) -> Vec<Record> {
    serde_json::from_value(value).expect("fixture literals must be record arrays")
}

/// Canonical records for the `Item` model.
pub fn item_records() -> Vec<Record> {
    records(json!([
        {"id": 1, "requiredStuff": "present", "name": "a"},
        {"id": 2, "requiredStuff": "present", "name": "b"}
    ]))
}

/// Canonical records for the `Item2` model.
pub fn item2_records() -> Vec<Record> {
    records(json!([
        {"id": 1, "requiredStuff": "present", "name": "x"},
        {"id": 2, "requiredStuff": "present", "name": "y"}
    ]))
}

/// Writes a fixture file into `dir`, creating the directory if needed.
pub fn write_fixture_file(dir: &Path, model: &str, records: &[Record]) {
    std::fs::create_dir_all(dir).expect("failed to create fixture directory");
    let content = serde_json::to_string_pretty(records).expect("failed to render fixture");
    std::fs::write(dir.join(format!("{model}.json")), content)
        .expect("failed to write fixture file");
}

/// Writes raw (possibly malformed) fixture content into `dir`.
pub fn write_raw_fixture(dir: &Path, model: &str, content: &str) {
    std::fs::create_dir_all(dir).expect("failed to create fixture directory");
    std::fs::write(dir.join(format!("{model}.json")), content)
        .expect("failed to write fixture file");
}

/// A temporary application root with `Item.json` and `Item2.json` under the
/// default fixtures path.
pub fn standard_app_root() -> TempDir {
    let root = tempfile::tempdir().expect("failed to create temp app root");
    let dir = root.path().join(DEFAULT_FIXTURES_DIR);
    write_fixture_file(&dir, "Item", &item_records());
    write_fixture_file(&dir, "Item2", &item2_records());
    root
}

/// A temporary application root whose only fixture names a model the host
/// never registered, so every load attempt fails at the model layer.
pub fn invalid_app_root() -> TempDir {
    let root = tempfile::tempdir().expect("failed to create temp app root");
    let dir = root.path().join(DEFAULT_FIXTURES_DIR);
    write_fixture_file(&dir, "Unregistered", &item_records());
    root
}
