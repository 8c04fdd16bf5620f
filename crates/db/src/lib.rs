//! PostgreSQL persistence for films.
//!
//! - [`repositories::FilmRepo`]: the SQL statements.
//! - [`filter`]: renders search predicates into `WHERE` clauses.
//! - [`store::PgFilmStore`]: plugs the repository into the core services.

use sqlx::postgres::PgPoolOptions;

pub mod filter;
pub mod models;
pub mod repositories;
pub mod store;

pub use store::{PgFilmStore, PgFilmTransaction};

pub type DbPool = sqlx::PgPool;

const DROP_SQL: &str = include_str!("../sql/drop.sql");
const CREATE_SQL: &str = include_str!("../sql/create.sql");
const SEED_SQL: &str = include_str!("../sql/seed.sql");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Drop and recreate the film tables, leaving them empty.
pub async fn create_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(DROP_SQL).execute(&mut *tx).await?;
    sqlx::raw_sql(CREATE_SQL).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("Film schema created");
    Ok(())
}

/// Drop and recreate the film tables and load the sample films.
///
/// Destroys existing data. Meant for development and tests.
pub async fn populate(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(DROP_SQL).execute(&mut *tx).await?;
    sqlx::raw_sql(CREATE_SQL).execute(&mut *tx).await?;
    sqlx::raw_sql(SEED_SQL).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("Film tables populated with sample data");
    Ok(())
}
