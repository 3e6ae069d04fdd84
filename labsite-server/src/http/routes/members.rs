//! Member endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{FormSubmission, RecordId};
use crate::http::server::AppState;
use crate::models::{public_image_url, Member, NewMember};

/// Member as returned to clients
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub research: String,
    pub email: String,
    pub image: String,
}

impl From<Member> for MemberResponse {
    fn from(m: Member) -> Self {
        Self {
            image: public_image_url(&m.image),
            id: m.id,
            name: m.name,
            position: m.position,
            research: m.research,
            email: m.email,
        }
    }
}

/// GET /api/members - all members, newest first
async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.members.list_all().await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// POST /api/members - create a member from a multipart form
async fn create_member(
    State(state): State<Arc<AppState>>,
    mut form: FormSubmission,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let draft = NewMember {
        name: form.require("name")?,
        position: form.require("position")?,
        research: form.require("research")?,
        email: form.require("email")?,
        image: String::new(),
    };

    let image = state.uploads.store(form.take_file("image")).await?;
    let id = state.members.insert(draft.with_image(image)).await?;
    tracing::info!(id, "member created");

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Member created"))))
}

/// DELETE /api/members/{id} - delete a member and its image
///
/// Unknown ids still answer 200.
async fn delete_member(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.members.delete_by_id(id, &state.uploads).await?;
    tracing::info!(id, "member deleted");

    Ok(Json(MessageResponse::new("Member deleted")))
}

/// Member routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/members", get(list_members).post(create_member))
        .route("/api/members/{id}", delete(delete_member))
}
