use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use models::comment;
use service::comments::{self, CommentInput, CommentPatch};
use service::pagination::Page;

use super::auth::{CurrentUser, ServerState};
use super::default_limit;
use crate::errors::JsonApiError;

/// List filter: optional news id plus the common paging window.
#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub news_id: Option<i32>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

#[utoipa::path(get, path = "/comments", tag = "comments", responses((status = 200, description = "List comments")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<CommentListQuery>,
) -> Result<Json<Vec<comment::Model>>, JsonApiError> {
    let page = Page { offset: q.offset, limit: q.limit };
    let items = comments::list_comments(&state.db, q.news_id, page).await?;
    Ok(Json(items))
}

#[utoipa::path(get, path = "/comments/{id}", tag = "comments", responses((status = 200, description = "Comment"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<comment::Model>, JsonApiError> {
    let item = comments::get_comment(&state.db, id).await?;
    Ok(Json(item))
}

#[utoipa::path(post, path = "/comments", tag = "comments", request_body = crate::openapi::CommentInputDoc, responses((status = 200, description = "Created"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized")))]
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(input): Json<CommentInput>,
) -> Result<Json<comment::Model>, JsonApiError> {
    let item = comments::create_comment(&state.db, input, user.id).await?;
    Ok(Json(item))
}

#[utoipa::path(put, path = "/comments/{id}", tag = "comments", request_body = crate::openapi::CommentPatchDoc, responses((status = 200, description = "Updated"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    user: CurrentUser,
    Json(patch): Json<CommentPatch>,
) -> Result<Json<comment::Model>, JsonApiError> {
    let item = comments::update_comment(&state.db, id, patch, user.id).await?;
    Ok(Json(item))
}

#[utoipa::path(delete, path = "/comments/{id}", tag = "comments", responses((status = 204, description = "Deleted"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    user: CurrentUser,
) -> Result<StatusCode, JsonApiError> {
    comments::delete_comment(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
