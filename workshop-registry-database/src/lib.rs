pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

use diesel_async::pooled_connection::deadpool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection as _};
pub use error::DatabaseError;
use tracing::info;

pub type Pool = deadpool::Pool<AsyncPgConnection>;

const CREATE_REGISTRY: &str = include_str!("../migrations/2024-05-01-000000_create_registry/up.sql");

// https://github.com/tokio-rs/axum/tree/main/examples/diesel-async-postgres

pub fn get_database_connection(database_url: &str) -> Result<Pool, DatabaseError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(deadpool::Pool::builder(config).build()?)
}

/// Creates the registry tables if they do not exist yet.
pub async fn run_migrations(pool: &Pool) -> Result<(), DatabaseError> {
    let mut connection = pool.get().await?;
    connection.batch_execute(CREATE_REGISTRY).await?;
    info!("database schema is up to date");
    Ok(())
}
