pub mod post_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory_repo;

use deadpool_postgres::Pool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Db(#[from] tokio_postgres::Error),
    #[error("not found")]
    NotFound,
    #[error("other: {0}")]
    Other(String),
}

const SCHEMA: &str = include_str!("../../migrations/001_init.sql");

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn run_migrations(pool: &Pool) -> Result<(), RepoError> {
    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    Ok(())
}
