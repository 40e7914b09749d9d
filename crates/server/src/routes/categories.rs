use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use models::category;
use service::categories::{self, CategoryInput, CategoryPatch};

use super::auth::ServerState;
use super::PageQuery;
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/categories", tag = "categories", responses((status = 200, description = "List categories")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    let items = categories::list_categories(&state.db, page.into()).await?;
    Ok(Json(items))
}

#[utoipa::path(get, path = "/categories/{id}", tag = "categories", responses((status = 200, description = "Category"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<category::Model>, JsonApiError> {
    let item = categories::get_category(&state.db, id).await?;
    Ok(Json(item))
}

#[utoipa::path(post, path = "/categories", tag = "categories", request_body = crate::openapi::CategoryInputDoc, responses((status = 200, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<category::Model>, JsonApiError> {
    let item = categories::create_category(&state.db, input).await?;
    Ok(Json(item))
}

#[utoipa::path(put, path = "/categories/{id}", tag = "categories", request_body = crate::openapi::CategoryInputDoc, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<category::Model>, JsonApiError> {
    let patch = CategoryPatch { name: Some(input.name) };
    let item = categories::update_category(&state.db, id, patch).await?;
    Ok(Json(item))
}

#[utoipa::path(patch, path = "/categories/{id}", tag = "categories", request_body = crate::openapi::CategoryPatchDoc, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn partial_update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<category::Model>, JsonApiError> {
    let item = categories::update_category(&state.db, id, patch).await?;
    Ok(Json(item))
}

#[utoipa::path(delete, path = "/categories/{id}", tag = "categories", responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    categories::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
