//! PostgreSQL infrastructure layer
//!
//! Implements the orchestrator's datasource and model-registry ports on
//! PostgreSQL using SQLx. Each fixture model maps to one table holding its
//! records as `jsonb`; re-migration drops and recreates that table.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgDataSource};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/app")).await?;
//! let datasource = PgDataSource::new("db", pool);
//! datasource.define_model("Item");
//! ```

pub mod adapter;
pub mod error;
pub mod pool;

pub use adapter::PgDataSource;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
