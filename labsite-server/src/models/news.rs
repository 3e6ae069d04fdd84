//! News posts

use serde::Serialize;
use sqlx::FromRow;

/// News post as stored in the `news` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub author: String,
    pub category: String,
    pub content: String,
    pub featured: bool,
    /// Upload path relative to the public mount, or empty
    pub image: String,
}

/// Field values for a news post that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub summary: String,
    pub author: String,
    pub category: String,
    pub content: String,
    pub featured: bool,
    pub image: String,
}

impl NewNews {
    /// Attach the stored upload path returned by the upload handler.
    pub fn with_image(mut self, image: String) -> Self {
        self.image = image;
        self
    }

    pub(crate) fn into_item(self, id: i64) -> NewsItem {
        NewsItem {
            id,
            title: self.title,
            summary: self.summary,
            author: self.author,
            category: self.category,
            content: self.content,
            featured: self.featured,
            image: self.image,
        }
    }
}

/// Interpret the `featured` form value.
///
/// Only the exact string `"true"` turns the flag on.
pub fn parse_featured(value: Option<&str>) -> bool {
    value == Some("true")
}
