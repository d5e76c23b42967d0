//! Database error types.

use thiserror::Error;

/// Pool setup and migration errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Migration directory not found in the current environment.
    #[error("migration directory not found; tried {tried}. Last error: {last_error}. Run from repo root or services/api.")]
    MigrationDirNotFound { tried: String, last_error: String },
}

/// Errors returned by an [`EventRepository`](super::EventRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No event has the requested id.
    #[error("event not found")]
    EventNotFound,

    /// The transaction could not be opened.
    #[error("failed to begin transaction: {0}")]
    TransactionBegin(#[source] sqlx::Error),

    /// The insert (or reading back its result) failed; the transaction was rolled back.
    #[error("failed to insert event: {0}")]
    Insert(#[source] sqlx::Error),

    /// The transaction could not be committed.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    /// A read query failed for a reason other than a missing row.
    #[error("failed to get event by id: {0}")]
    Query(#[source] sqlx::Error),
}

impl RepositoryError {
    /// Returns true if this error means the event does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::EventNotFound)
    }
}
