//! Database layer - connection providers and repositories
//!
//! # Design Principles
//!
//! - Connections come from an injected provider, pooled or per-request
//! - A connection never outlives the repository call that acquired it
//! - Parameterized statements only, no string-built SQL
//! - No retries; failures surface to the handler immediately

pub mod error;
pub mod memory;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pool::{
    provider_from_config, ConnectionProvider, DatabaseProbe, DbConnection, DirectProvider,
    PgProbe, PoolProvider,
};
pub use repos::{MemberStore, NewsStore, PgMemberRepo, PgNewsRepo};

/// PostgreSQL schema for the `news` and `members` tables.
pub const SCHEMA: &str = include_str!("../../schema.sql");

#[cfg(test)]
pub(crate) mod test_support {
    use std::str::FromStr;

    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
    use sqlx::PgPool;
    use uuid::Uuid;

    /// Pool bound to a throwaway schema with the tables created.
    pub async fn fresh_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let schema = format!("labsite_test_{}", Uuid::new_v4().simple());

        let admin = PgPool::connect(&url).await.expect("connect failed");
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .expect("create schema failed");
        admin.close().await;

        let options = PgConnectOptions::from_str(&url)
            .expect("bad DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("pool creation failed");

        sqlx::raw_sql(super::SCHEMA)
            .execute(&pool)
            .await
            .expect("schema setup failed");

        pool
    }
}
