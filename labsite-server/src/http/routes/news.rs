//! News endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::FormSubmission;
use crate::http::server::AppState;
use crate::models::{parse_featured, public_image_url, NewNews, NewsItem};

/// News post as returned to clients
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub author: String,
    pub category: String,
    pub content: String,
    pub featured: bool,
    pub image: String,
}

impl From<NewsItem> for NewsResponse {
    fn from(n: NewsItem) -> Self {
        Self {
            image: public_image_url(&n.image),
            id: n.id,
            title: n.title,
            summary: n.summary,
            author: n.author,
            category: n.category,
            content: n.content,
            featured: n.featured,
        }
    }
}

/// GET /api/news - all posts, newest first
async fn list_news(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsResponse>>, ApiError> {
    let items = state.news.list_all().await?;
    Ok(Json(items.into_iter().map(NewsResponse::from).collect()))
}

/// POST /api/news - create a post from a multipart form
async fn create_news(
    State(state): State<Arc<AppState>>,
    mut form: FormSubmission,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // All required fields are checked before anything touches disk
    let draft = NewNews {
        title: form.require("title")?,
        summary: form.require("summary")?,
        author: form.require("author")?,
        category: form.require("category")?,
        content: form.require("content")?,
        featured: parse_featured(form.optional("featured")),
        image: String::new(),
    };

    let image = state.uploads.store(form.take_file("image")).await?;
    let id = state.news.insert(draft.with_image(image)).await?;
    tracing::info!(id, "news created");

    Ok((StatusCode::CREATED, Json(MessageResponse::new("News created"))))
}

/// News routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/news", get(list_news).post(create_news))
}
