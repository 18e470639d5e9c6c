pub mod connection;
pub mod job_repository;
pub mod migrations;
pub mod models;

#[cfg(test)]
pub mod test_support;

/// Errors raised by the job store
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
