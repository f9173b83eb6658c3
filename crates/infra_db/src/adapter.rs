//! PostgreSQL datasource adapter
//!
//! One table per fixture model, records stored as `jsonb`. Re-migration is
//! a `DROP TABLE` + `CREATE TABLE` pair inside one transaction, matching the
//! drop-and-recreate semantics the orchestrator expects from `automigrate`.

use std::collections::BTreeSet;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;

use fixture_core::{CreateError, DataSource, MigrateError, ModelRegistry, Record};

use crate::error::DatabaseError;

/// Quotes a model name as a PostgreSQL identifier, preserving case.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(model: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, data JSONB NOT NULL)",
        quote_ident(model)
    )
}

fn drop_table_sql(model: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(model))
}

fn insert_sql(model: &str) -> String {
    format!("INSERT INTO {} (data) VALUES ($1)", quote_ident(model))
}

fn count_sql(model: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(model))
}

/// A named PostgreSQL datastore serving both orchestrator ports.
///
/// Models must be declared up front with [`define_model`]; addressing an
/// undeclared model fails the same way a wrong-case `automigrate` does on
/// other connectors.
///
/// [`define_model`]: PgDataSource::define_model
pub struct PgDataSource {
    name: String,
    pool: PgPool,
    models: RwLock<BTreeSet<String>>,
}

impl PgDataSource {
    pub fn new(name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            name: name.into(),
            pool,
            models: RwLock::new(BTreeSet::new()),
        }
    }

    /// Declares a fixture model backed by this datastore.
    pub fn define_model(&self, model: &str) {
        self.write_models().insert(model.to_string());
    }

    /// Creates the backing table for every declared model.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for model in self.declared() {
            sqlx::query(&create_table_sql(&model))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Record count for a declared model.
    pub async fn count(&self, model: &str) -> Result<i64, DatabaseError> {
        if !self.is_declared(model) {
            return Err(DatabaseError::unknown_model(model));
        }
        let (count,): (i64,) = sqlx::query_as(&count_sql(model))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn declared(&self) -> Vec<String> {
        self.read_models().iter().cloned().collect()
    }

    fn is_declared(&self, model: &str) -> bool {
        self.read_models().contains(model)
    }

    fn read_models(&self) -> std::sync::RwLockReadGuard<'_, BTreeSet<String>> {
        self.models
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_models(&self) -> std::sync::RwLockWriteGuard<'_, BTreeSet<String>> {
        self.models
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn remigrate(&self, model: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&drop_table_sql(model))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&create_table_sql(model))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ModelRegistry for PgDataSource {
    fn model_names(&self) -> Vec<String> {
        self.declared()
    }

    async fn create_records(&self, model: &str, records: &[Record]) -> Result<(), CreateError> {
        if !self.is_declared(model) {
            return Err(CreateError::new(model, "model is not defined"));
        }
        let sql = insert_sql(model);
        for record in records {
            sqlx::query(&sql)
                .bind(serde_json::Value::Object(record.clone()))
                .execute(&self.pool)
                .await
                .map_err(|err| CreateError::new(model, err.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for PgDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn automigrate(&self, model: &str) -> Result<(), MigrateError> {
        if !self.is_declared(model) {
            return Err(MigrateError::new(&self.name, model, "model is not defined"));
        }
        tracing::debug!(model, datasource = %self.name, "re-migrating table");
        self.remigrate(model)
            .await
            .map_err(|err| MigrateError::new(&self.name, model, err.to_string()))
    }

    async fn automigrate_all(&self) -> Result<(), MigrateError> {
        for model in self.declared() {
            self.remigrate(&model)
                .await
                .map_err(|err| MigrateError::new(&self.name, &model, err.to_string()))?;
        }
        Ok(())
    }
}
