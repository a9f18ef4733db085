//! Project document storage.
//!
//! [`ProjectStore`] is the seam the application talks to. Two backends
//! implement it: [`MemoryStore`] for tests and single-process use, and
//! [`PgProjectStore`], which keeps each project as a JSONB document and relays
//! changes through Postgres `NOTIFY`.

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgProjectStore;
pub use store::{subscribe, ProjectStore, Subscription};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
