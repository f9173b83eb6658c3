//! In-memory datastore

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use fixture_core::{CreateError, DataSource, MigrateError, ModelRegistry, Record};

struct ModelTable {
    required: Vec<String>,
    records: Vec<Record>,
}

/// An in-memory datastore with named, schema-light model tables.
///
/// Model names are case-sensitive, like the tables of a real connector:
/// `automigrate("item")` fails when the model was defined as `"Item"`.
pub struct MemoryDataSource {
    name: String,
    tables: RwLock<BTreeMap<String, ModelTable>>,
}

impl MemoryDataSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    /// Defines a model with no required fields.
    pub fn define_model(&self, model: &str) {
        self.define_model_with_required(model, &[]);
    }

    /// Defines a model; records missing one of `required` are rejected.
    pub fn define_model_with_required(&self, model: &str, required: &[&str]) {
        let mut tables = self.write_tables();
        tables.insert(
            model.to_string(),
            ModelTable {
                required: required.iter().map(|field| field.to_string()).collect(),
                records: Vec::new(),
            },
        );
    }

    /// A snapshot of a model's records, or `None` for an unknown model.
    pub fn records(&self, model: &str) -> Option<Vec<Record>> {
        self.read_tables()
            .get(model)
            .map(|table| table.records.clone())
    }

    /// Record count for a model, or `None` for an unknown model.
    pub fn count(&self, model: &str) -> Option<usize> {
        self.read_tables()
            .get(model)
            .map(|table| table.records.len())
    }

    fn read_tables(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, ModelTable>> {
        self.tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_tables(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, ModelTable>> {
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ModelRegistry for MemoryDataSource {
    fn model_names(&self) -> Vec<String> {
        self.read_tables().keys().cloned().collect()
    }

    async fn create_records(&self, model: &str, records: &[Record]) -> Result<(), CreateError> {
        let mut tables = self.write_tables();
        let table = tables
            .get_mut(model)
            .ok_or_else(|| CreateError::new(model, "model is not registered"))?;

        for record in records {
            for field in &table.required {
                let missing = record
                    .get(field)
                    .map(|value| value.is_null())
                    .unwrap_or(true);
                if missing {
                    // records inserted before this one stay; no rollback
                    return Err(CreateError::new(
                        model,
                        format!("missing required field '{field}'"),
                    ));
                }
            }
            table.records.push(record.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn automigrate(&self, model: &str) -> Result<(), MigrateError> {
        let mut tables = self.write_tables();
        match tables.get_mut(model) {
            Some(table) => {
                table.records.clear();
                Ok(())
            }
            None => Err(MigrateError::new(
                &self.name,
                model,
                "model is not registered",
            )),
        }
    }

    async fn automigrate_all(&self) -> Result<(), MigrateError> {
        let mut tables = self.write_tables();
        for table in tables.values_mut() {
            table.records.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("fixture records must be objects, got {other}"),
        }
    }

    fn item_store() -> MemoryDataSource {
        let store = MemoryDataSource::new("db");
        store.define_model_with_required("Item", &["requiredStuff"]);
        store
    }

    #[tokio::test]
    async fn create_appends_records() {
        let store = item_store();
        store
            .create_records(
                "Item",
                &[record(json!({"id": 1, "requiredStuff": "yes"}))],
            )
            .await
            .unwrap();
        store
            .create_records(
                "Item",
                &[record(json!({"id": 1, "requiredStuff": "again"}))],
            )
            .await
            .unwrap();

        // additive, no de-duplication
        assert_eq!(store.count("Item"), Some(2));
    }

    #[tokio::test]
    async fn create_rejects_unknown_models() {
        let store = item_store();
        let err = store
            .create_records("Nope", &[record(json!({"id": 1}))])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }

    #[tokio::test]
    async fn create_enforces_required_fields() {
        let store = item_store();
        let err = store
            .create_records(
                "Item",
                &[
                    record(json!({"id": 1, "requiredStuff": "yes"})),
                    record(json!({"id": 2})),
                ],
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("requiredStuff"));
        // the record before the bad one was kept
        assert_eq!(store.count("Item"), Some(1));
    }

    #[tokio::test]
    async fn automigrate_is_case_sensitive() {
        let store = item_store();
        store
            .create_records(
                "Item",
                &[record(json!({"id": 1, "requiredStuff": "yes"}))],
            )
            .await
            .unwrap();

        assert!(store.automigrate("item").await.is_err());
        assert_eq!(store.count("Item"), Some(1));

        store.automigrate("Item").await.unwrap();
        assert_eq!(store.count("Item"), Some(0));
    }

    #[tokio::test]
    async fn automigrate_all_empties_every_table() {
        let store = item_store();
        store.define_model("Item2");
        store
            .create_records(
                "Item",
                &[record(json!({"id": 1, "requiredStuff": "yes"}))],
            )
            .await
            .unwrap();
        store
            .create_records("Item2", &[record(json!({"id": 1}))])
            .await
            .unwrap();

        store.automigrate_all().await.unwrap();
        assert_eq!(store.count("Item"), Some(0));
        assert_eq!(store.count("Item2"), Some(0));
    }
}
