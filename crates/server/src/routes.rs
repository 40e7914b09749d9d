use axum::{routing::get, routing::post, Json, Router};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::pagination::Page;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod categories;
pub mod comments;
pub mod news;

use auth::ServerState;

/// Common `offset`/`limit` query parameters for list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

pub(crate) fn default_limit() -> u64 {
    10
}

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self {
        Page { offset: q.offset, limit: q.limit }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: entity routes, auth, stored media,
/// API docs, CORS and request tracing.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let media_dir = state.media.dir().to_path_buf();

    Router::new()
        .route("/health", get(health))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get_one)
                .put(categories::update)
                .patch(categories::partial_update)
                .delete(categories::delete),
        )
        .route("/news", get(news::list).post(news::create))
        .route("/news/:id", get(news::get_one).put(news::update).delete(news::delete))
        .route("/news/:id/image", post(news::upload_image))
        .route("/comments", get(comments::list).post(comments::create))
        .route(
            "/comments/:id",
            get(comments::get_one).put(comments::update).delete(comments::delete),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .nest_service("/media", ServeDir::new(media_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
