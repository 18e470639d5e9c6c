use sqlx::{Pool, Postgres};
use tracing::info;

use super::PersistenceError;

/// Apply pending migrations from `migrations/`
///
/// Safe to run repeatedly; sqlx records which versions are applied.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), PersistenceError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
