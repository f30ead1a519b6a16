//! Default `SQLite` backend: build a pool descriptor from the options, then
//! open it.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;

use crate::domain::models::ConnectOptions;
use crate::domain::ports::{Backend, ConnectError};

/// Backend over a `SQLite` connection pool
#[derive(Debug)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// The underlying pool, for callers that run queries themselves
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn is_open(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn close(&self) -> Result<(), ConnectError> {
        self.pool.close().await;
        Ok(())
    }
}

/// Open a pool for the given options.
///
/// WAL journal mode, NORMAL synchronous, and foreign keys match the settings
/// a concurrent embedded workload wants; the 5 second busy timeout absorbs
/// lock contention during startup.
pub async fn open(options: &ConnectOptions) -> Result<SqliteBackend, ConnectError> {
    let connect_options = SqliteConnectOptions::from_str(&options.url)
        .map_err(|_| ConnectError::InvalidUrl(options.url.clone()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .map_err(ConnectError::PoolCreation)?;

    Ok(SqliteBackend { pool })
}
