//! Error types for the catalog cache.

use thiserror::Error;

/// Cache operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Catalog cache errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
