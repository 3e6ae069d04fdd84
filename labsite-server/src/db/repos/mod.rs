//! Record repositories
//!
//! Each repository follows these patterns:
//! - One connection per operation, taken from the injected provider
//! - Fixed-column statements with positional binds
//! - Listings ordered newest first (`id DESC`)
//!
//! Handlers only see the [`NewsStore`] and [`MemberStore`] traits, so the
//! Postgres repositories and the in-memory store are interchangeable.

pub mod news;
pub mod members;

use async_trait::async_trait;

use super::DbError;
use crate::models::{Member, NewMember, NewNews, NewsItem};
use crate::storage::ImageCleanup;

pub use members::PgMemberRepo;
pub use news::PgNewsRepo;

/// Storage for news posts
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Insert a post and return its generated id.
    async fn insert(&self, news: NewNews) -> Result<i64, DbError>;

    /// All posts, highest id first. Image paths are returned as stored.
    async fn list_all(&self) -> Result<Vec<NewsItem>, DbError>;
}

/// Storage for lab members
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Insert a member and return the generated id.
    async fn insert(&self, member: NewMember) -> Result<i64, DbError>;

    /// All members, highest id first. Image paths are returned as stored.
    async fn list_all(&self) -> Result<Vec<Member>, DbError>;

    /// Delete a member and best-effort remove its image.
    ///
    /// Image removal happens before the row delete and never fails the call.
    /// Unknown ids are a successful no-op.
    async fn delete_by_id(&self, id: i64, cleanup: &dyn ImageCleanup) -> Result<(), DbError>;
}
