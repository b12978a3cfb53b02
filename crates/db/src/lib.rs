//! Session persistence.
//!
//! A session is stored as one root document plus named sub-documents
//! (`feedback`, `technical`). All writes go through a [`batch::WriteBatch`]
//! committed atomically by a [`backend::SessionBackend`]; the
//! [`store::SessionStore`] layers ownership checks on top.

use sqlx::postgres::PgPoolOptions;

pub mod backend;
pub mod batch;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
