//! News repository
//!
//! - insert: single INSERT ... RETURNING id
//! - list: every column, newest first

use std::sync::Arc;

use async_trait::async_trait;

use super::NewsStore;
use crate::db::{ConnectionProvider, DbError};
use crate::models::{NewNews, NewsItem};

/// Postgres-backed news repository
#[derive(Clone)]
pub struct PgNewsRepo {
    provider: Arc<dyn ConnectionProvider>,
}

impl PgNewsRepo {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl NewsStore for PgNewsRepo {
    async fn insert(&self, news: NewNews) -> Result<i64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO news (title, summary, author, category, content, featured, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&news.title)
        .bind(&news.summary)
        .bind(&news.author)
        .bind(&news.category)
        .bind(&news.content)
        .bind(news.featured)
        .bind(&news.image)
        .fetch_one(&mut **conn)
        .await?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<NewsItem>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let items = sqlx::query_as::<_, NewsItem>(
            r#"
            SELECT id, title, summary, author, category, content, featured, image
            FROM news
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&mut **conn)
        .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_support, PoolProvider};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p labsite-server -- --ignored

    fn draft(title: &str, featured: bool) -> NewNews {
        NewNews {
            title: title.into(),
            summary: "summary".into(),
            author: "Prof. Kim".into(),
            category: "Lab".into(),
            content: "content".into(),
            featured,
            image: String::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_list_newest_first() {
        let pool = test_support::fresh_pool().await;
        let repo = PgNewsRepo::new(Arc::new(PoolProvider::from_pool(pool)));

        let first = repo.insert(draft("first", false)).await.unwrap();
        let second = repo.insert(draft("second", true)).await.unwrap();
        assert!(second > first);

        let items = repo.list_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second);
        assert!(items[0].featured);
        assert_eq!(items[1].id, first);
        assert!(!items[1].featured);
        assert_eq!(items[1].image, "");
    }
}
