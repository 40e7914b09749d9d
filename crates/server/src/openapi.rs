use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct CategoryInputDoc {
    pub name: String,
}

#[derive(ToSchema)]
pub struct CategoryPatchDoc {
    pub name: Option<String>,
}

#[derive(ToSchema)]
pub struct NewsInputDoc {
    pub title: String,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_id: i32,
}

#[derive(ToSchema)]
pub struct CommentInputDoc {
    pub content: String,
    pub news_id: i32,
}

#[derive(ToSchema)]
pub struct CommentPatchDoc {
    pub content: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::categories::list,
        crate::routes::categories::get_one,
        crate::routes::categories::create,
        crate::routes::categories::update,
        crate::routes::categories::partial_update,
        crate::routes::categories::delete,
        crate::routes::news::list,
        crate::routes::news::get_one,
        crate::routes::news::create,
        crate::routes::news::update,
        crate::routes::news::upload_image,
        crate::routes::news::delete,
        crate::routes::comments::list,
        crate::routes::comments::get_one,
        crate::routes::comments::create,
        crate::routes::comments::update,
        crate::routes::comments::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            CategoryInputDoc,
            CategoryPatchDoc,
            NewsInputDoc,
            CommentInputDoc,
            CommentPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "categories"),
        (name = "news"),
        (name = "comments")
    )
)]
pub struct ApiDoc;
