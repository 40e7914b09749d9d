use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::{header, request::Parts, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{Claims, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::media::MediaStore;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub media: Arc<MediaStore>,
}

/// The caller identity resolved from a bearer credential. Handlers that
/// need ownership checks take this as an extractor; rejection is 401.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    ServerState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServerState::from_ref(state);

        // Authorization header first, auth_token cookie as fallback.
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|s| s.to_string());
        let token = match bearer {
            Some(t) => t,
            None => CookieJar::from_headers(&parts.headers)
                .get("auth_token")
                .map(|c| c.value().to_string())
                .ok_or_else(|| JsonApiError::unauthorized("missing bearer token"))?,
        };

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| JsonApiError::unauthorized("invalid token"))?;

        let id = Uuid::parse_str(&data.claims.uid)
            .map_err(|_| JsonApiError::unauthorized("malformed token subject"))?;
        Ok(CurrentUser { id, email: data.claims.sub })
    }
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    )
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, JsonApiError> {
    let user = auth_service(&state).register(input).await?;
    Ok(Json(RegisterOutput { user_id: user.id }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = auth_service(&state).login(input).await?;
    let user = session.user;
    let Some(token) = session.token else {
        return Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            Some("token generation failed".into()),
        ));
    };

    let mut cookie = Cookie::new("auth_token", token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    Ok((jar, Json(LoginOutput { user_id: user.id, email: user.email, name: user.name, token })))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<MeOutput>, JsonApiError> {
    let repo = SeaOrmAuthRepository { db: state.db.clone() };
    let found = repo
        .find_user_by_email(&user.email)
        .await?
        .ok_or_else(|| JsonApiError::unauthorized("user no longer exists"))?;
    Ok(Json(MeOutput { user_id: found.id, email: found.email, name: found.name }))
}
