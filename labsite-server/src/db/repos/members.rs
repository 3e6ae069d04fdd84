//! Member repository
//!
//! - insert: single INSERT ... RETURNING id
//! - list: every column, newest first
//! - delete: read image, discard file, delete row, all on one connection

use std::sync::Arc;

use async_trait::async_trait;

use super::MemberStore;
use crate::db::{ConnectionProvider, DbError};
use crate::models::{Member, NewMember};
use crate::storage::ImageCleanup;

/// Postgres-backed member repository
#[derive(Clone)]
pub struct PgMemberRepo {
    provider: Arc<dyn ConnectionProvider>,
}

impl PgMemberRepo {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl MemberStore for PgMemberRepo {
    async fn insert(&self, member: NewMember) -> Result<i64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO members (name, position, research, email, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.research)
        .bind(&member.email)
        .bind(&member.image)
        .fetch_one(&mut **conn)
        .await?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Member>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, position, research, email, image
            FROM members
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&mut **conn)
        .await?;

        Ok(members)
    }

    async fn delete_by_id(&self, id: i64, cleanup: &dyn ImageCleanup) -> Result<(), DbError> {
        let mut conn = self.provider.acquire().await?;
        let mut tx = sqlx::Connection::begin(&mut **conn).await?;

        let image = sqlx::query_scalar::<_, String>(
            "SELECT image FROM members WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(image) = image.filter(|i| !i.is_empty()) {
            cleanup.discard(&image).await.log();
        }

        let deleted = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.map_err(DbError::Statement)?;

        tracing::debug!(id, deleted, "member delete committed");
        Ok(())
    }
}
