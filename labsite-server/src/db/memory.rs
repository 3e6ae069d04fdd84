//! In-memory record store
//!
//! Implements the same traits as the Postgres repositories. Used by
//! `labsite serve --in-memory` for frontend work without a database, and by
//! the router tests. Contents are lost on shutdown.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DatabaseProbe, DbError, MemberStore, NewsStore};
use crate::models::{Member, NewMember, NewNews, NewsItem};
use crate::storage::ImageCleanup;

#[derive(Default)]
struct Tables {
    last_news_id: i64,
    news: Vec<NewsItem>,
    last_member_id: i64,
    members: Vec<Member>,
}

/// Process-local stand-in for the database
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn insert(&self, news: NewNews) -> Result<i64, DbError> {
        let mut tables = self.tables.write().await;
        tables.last_news_id += 1;
        let id = tables.last_news_id;
        tables.news.push(news.into_item(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<NewsItem>, DbError> {
        let tables = self.tables.read().await;
        let mut items = tables.news.clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn insert(&self, member: NewMember) -> Result<i64, DbError> {
        let mut tables = self.tables.write().await;
        tables.last_member_id += 1;
        let id = tables.last_member_id;
        tables.members.push(member.into_member(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Member>, DbError> {
        let tables = self.tables.read().await;
        let mut members = tables.members.clone();
        members.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(members)
    }

    async fn delete_by_id(&self, id: i64, cleanup: &dyn ImageCleanup) -> Result<(), DbError> {
        let image = {
            let tables = self.tables.read().await;
            tables
                .members
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.image.clone())
        };

        if let Some(image) = image.filter(|i| !i.is_empty()) {
            cleanup.discard(&image).await.log();
        }

        self.tables.write().await.members.retain(|m| m.id != id);
        Ok(())
    }
}

#[async_trait]
impl DatabaseProbe for MemoryStore {
    async fn current_time(&self) -> Result<DateTime<Utc>, DbError> {
        Ok(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Cleanup;
    use std::sync::Mutex;

    /// Records every image it is asked to discard
    #[derive(Default)]
    struct RecordingCleanup {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageCleanup for RecordingCleanup {
        async fn discard(&self, image: &str) -> Cleanup {
            self.seen.lock().unwrap().push(image.to_owned());
            Cleanup::Foreign(image.to_owned())
        }
    }

    fn member(name: &str, image: &str) -> NewMember {
        NewMember {
            name: name.into(),
            position: "Master's Student".into(),
            research: "Databases".into(),
            email: format!("{}@x.edu", name),
            image: image.into(),
        }
    }

    #[tokio::test]
    async fn ids_increase_and_list_is_newest_first() {
        let store = MemoryStore::new();
        let a = MemberStore::insert(&store, member("a", "")).await.unwrap();
        let b = MemberStore::insert(&store, member("b", "")).await.unwrap();
        let c = MemberStore::insert(&store, member("c", "")).await.unwrap();
        assert!(a < b && b < c);

        let ids: Vec<i64> = MemberStore::list_all(&store)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[tokio::test]
    async fn news_and_member_ids_are_independent() {
        let store = MemoryStore::new();
        let member_id = MemberStore::insert(&store, member("a", "")).await.unwrap();
        let news_id = NewsStore::insert(
            &store,
            NewNews {
                title: "t".into(),
                summary: "s".into(),
                author: "a".into(),
                category: "c".into(),
                content: "body".into(),
                featured: false,
                image: String::new(),
            },
        )
        .await
        .unwrap();

        assert_eq!(member_id, 1);
        assert_eq!(news_id, 1);
    }

    #[tokio::test]
    async fn delete_discards_image_only_when_present() {
        let store = MemoryStore::new();
        let cleanup = RecordingCleanup::default();

        let with_image = MemberStore::insert(&store, member("a", "profile/a.png"))
            .await
            .unwrap();
        let without = MemberStore::insert(&store, member("b", "")).await.unwrap();

        store.delete_by_id(with_image, &cleanup).await.unwrap();
        store.delete_by_id(without, &cleanup).await.unwrap();

        assert_eq!(*cleanup.seen.lock().unwrap(), vec!["profile/a.png".to_string()]);
        assert!(MemberStore::list_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_rows() {
        let store = MemoryStore::new();
        let cleanup = RecordingCleanup::default();
        MemberStore::insert(&store, member("a", "")).await.unwrap();

        store.delete_by_id(42, &cleanup).await.unwrap();

        assert_eq!(MemberStore::list_all(&store).await.unwrap().len(), 1);
        assert!(cleanup.seen.lock().unwrap().is_empty());
    }
}
