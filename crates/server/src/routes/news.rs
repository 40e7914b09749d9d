use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use models::news as news_model;
use service::news::{self, NewsInput};

use super::auth::ServerState;
use super::PageQuery;
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/news", tag = "news", responses((status = 200, description = "List news")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<news_model::Model>>, JsonApiError> {
    let items = news::list_news(&state.db, page.into()).await?;
    Ok(Json(items))
}

#[utoipa::path(get, path = "/news/{id}", tag = "news", responses((status = 200, description = "News"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<news_model::Model>, JsonApiError> {
    let item = news::get_news(&state.db, id).await?;
    Ok(Json(item))
}

#[utoipa::path(post, path = "/news", tag = "news", request_body = crate::openapi::NewsInputDoc, responses((status = 200, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewsInput>,
) -> Result<Json<news_model::Model>, JsonApiError> {
    let item = news::create_news(&state.db, input).await?;
    Ok(Json(item))
}

#[utoipa::path(put, path = "/news/{id}", tag = "news", request_body = crate::openapi::NewsInputDoc, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<NewsInput>,
) -> Result<Json<news_model::Model>, JsonApiError> {
    let item = news::update_news(&state.db, id, input).await?;
    Ok(Json(item))
}

/// Accepts a multipart form with a single `image` file field. The upload
/// is persisted by the media store and becomes the article's only image
/// reference.
#[utoipa::path(post, path = "/news/{id}/image", tag = "news", responses((status = 200, description = "Image attached"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn upload_image(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<news_model::Model>, JsonApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(e.to_string())))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(e.to_string()))
        })?;
        let item = news::attach_image(&state.db, &state.media, id, &filename, &bytes).await?;
        return Ok(Json(item));
    }
    Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some("missing image field".into())))
}

#[utoipa::path(delete, path = "/news/{id}", tag = "news", responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    news::delete_news(&state.db, &state.media, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
