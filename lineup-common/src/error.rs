//! Common error types for Livestock Lineup

use thiserror::Error;

/// Common result type for lineup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the lineup crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when a database error is a foreign key violation.
    ///
    /// SQLite reports these as extended code 787 (SQLITE_CONSTRAINT_FOREIGNKEY).
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("787")
                    || db_err.message().contains("FOREIGN KEY constraint failed")
            }
            _ => false,
        }
    }
}
