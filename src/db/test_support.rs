//! Postgres for the store tests.
//!
//! One container is started on first use and shared by every test in the
//! run; migrations are applied once. Each test gets its own pool because
//! `#[actix_web::test]` gives every test its own runtime.

use sqlx::{Pool, Postgres};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::OnceCell;

use super::{connection::get_connection, migrations::run_migrations};

struct SharedDatabase {
    url: String,
    // Keeps the container alive for the whole test run
    _container: ContainerAsync<PostgresImage>,
}

static SHARED_DATABASE: OnceCell<SharedDatabase> = OnceCell::const_new();

impl SharedDatabase {
    async fn start() -> Self {
        let container = PostgresImage::default()
            .with_tag("16-alpine")
            .start()
            .await
            .expect("start postgres container");

        let host = container.get_host().await.expect("container host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("container port");
        let url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = get_connection(&url, 1).await.expect("connect for migrations");
        run_migrations(&pool).await.expect("migrate test database");
        pool.close().await;

        Self {
            url,
            _container: container,
        }
    }
}

/// Fresh pool on the shared, migrated test database
pub async fn test_pool() -> Pool<Postgres> {
    let shared = SHARED_DATABASE.get_or_init(SharedDatabase::start).await;
    get_connection(&shared.url, 2)
        .await
        .expect("connect to test database")
}
