//! Database error types

use thiserror::Error;

/// Errors raised by the PostgreSQL adapter.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A fixture model was addressed that was never defined on this adapter
    #[error("model '{0}' is not defined on this datasource")]
    UnknownModel(String),

    /// Re-migration of a model's table failed
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Generic SQL error
    #[error("sql error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn unknown_model(model: impl Into<String>) -> Self {
        DatabaseError::UnknownModel(model.into())
    }

    /// Whether this error is a connection-level problem rather than a
    /// statement-level one.
    pub fn is_connection_error(&self) -> bool {
        match self {
            DatabaseError::ConnectionFailed(_) => true,
            DatabaseError::SqlError(err) => matches!(err, sqlx::Error::PoolTimedOut),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_names_the_model() {
        let err = DatabaseError::unknown_model("Item");
        assert!(err.to_string().contains("Item"));
        assert!(!err.is_connection_error());
    }

    #[test]
    fn connection_failures_are_flagged() {
        let err = DatabaseError::ConnectionFailed("refused".into());
        assert!(err.is_connection_error());
    }
}
