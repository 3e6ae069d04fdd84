//! Connection providers
//!
//! Repositories ask a [`ConnectionProvider`] for one connection per operation
//! and drop it when done, so it is released on every exit path. Two
//! providers exist: a sqlx `PgPool` and a plain connect-per-request one.

use std::ops::DerefMut;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};

use super::DbError;
use crate::config::DatabaseConfig;

/// Connection handed out by a provider. Dropping it releases it.
pub type DbConnection = Box<dyn DerefMut<Target = PgConnection> + Send>;

/// Source of database connections for repositories.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Get a connection scoped to a single operation.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` if the database can't be reached.
    async fn acquire(&self) -> Result<DbConnection, DbError>;
}

/// Pooled connections, returned to the pool on drop.
#[derive(Clone)]
pub struct PoolProvider {
    pool: PgPool,
}

impl PoolProvider {
    /// Build a pool without connecting yet.
    ///
    /// Connections are opened on first use, so the server can start while
    /// the database is still coming up.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let provider = PoolProvider::connect_lazy("postgres://localhost/labsite", 5)?;
    /// ```
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)
            .map_err(DbError::Connection)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionProvider for PoolProvider {
    async fn acquire(&self) -> Result<DbConnection, DbError> {
        let conn = self.pool.acquire().await.map_err(DbError::Connection)?;
        Ok(Box::new(conn))
    }
}

/// Opens a fresh connection for every request; closed when dropped.
#[derive(Clone)]
pub struct DirectProvider {
    options: PgConnectOptions,
}

impl DirectProvider {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_url(database_url: &str) -> Result<Self, DbError> {
        let options = PgConnectOptions::from_str(database_url).map_err(DbError::Connection)?;
        Ok(Self::new(options))
    }
}

#[async_trait]
impl ConnectionProvider for DirectProvider {
    async fn acquire(&self) -> Result<DbConnection, DbError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(DbError::Connection)?;
        // A bare PgConnection has no DerefMut; the inner box provides it
        Ok(Box::new(Box::new(conn)))
    }
}

/// Build the provider selected by `config`.
pub fn provider_from_config(
    database_url: &str,
    config: &DatabaseConfig,
) -> Result<Arc<dyn ConnectionProvider>, DbError> {
    if config.pooled {
        tracing::info!(max_connections = config.max_connections, "using pooled connections");
        Ok(Arc::new(PoolProvider::connect_lazy(
            database_url,
            config.max_connections,
        )?))
    } else {
        tracing::info!("using one connection per request");
        Ok(Arc::new(DirectProvider::from_url(database_url)?))
    }
}

/// Connectivity check used by the debug endpoint.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Database server clock, proving a round-trip works.
    async fn current_time(&self) -> Result<DateTime<Utc>, DbError>;
}

/// Probe running `SELECT NOW()` over a provider connection.
#[derive(Clone)]
pub struct PgProbe {
    provider: Arc<dyn ConnectionProvider>,
}

impl PgProbe {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DatabaseProbe for PgProbe {
    async fn current_time(&self) -> Result<DateTime<Utc>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&mut **conn)
            .await?;
        Ok(now)
    }
}
