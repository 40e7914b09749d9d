use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use tower::Service;

use server::routes::{self, auth};
use service::media::MediaStore;

struct TestApp {
    app: Router,
    media: Arc<MediaStore>,
    // keeps the media directory alive for the test's duration
    _tmp: tempfile::TempDir,
}

async fn build_app() -> anyhow::Result<TestApp> {
    // In-memory database; a single-connection pool keeps every statement on
    // the same SQLite handle.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;

    let tmp = tempfile::tempdir()?;
    let media = Arc::new(MediaStore::new(tmp.path()).await?);

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into() },
        media: Arc::clone(&media),
    };
    let cors = tower_http::cors::CorsLayer::very_permissive();
    Ok(TestApp { app: routes::build_router(state, cors), media, _tmp: tmp })
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(serde_json::to_vec(body).unwrap())).unwrap()
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    // non-JSON bodies (static files, empty responses) come back as Null
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, body))
}

async fn register_and_login(app: &Router, email: &str, name: &str) -> anyhow::Result<String> {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({"email": email, "name": name, "password": "S3curePass!"}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({"email": email, "password": "S3curePass!"}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["token"].as_str().expect("token in login body").to_string())
}

#[tokio::test]
async fn end_to_end_comment_ownership_and_cascade() -> anyhow::Result<()> {
    let t = build_app().await?;
    let app = &t.app;

    let token_u = register_and_login(app, "u@example.com", "U").await?;
    let token_v = register_and_login(app, "v@example.com", "V").await?;

    // category -> news
    let (status, cat) =
        send(app, json_request("POST", "/categories", None, &json!({"name": "Tech"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let cat_id = cat["id"].as_i64().unwrap();

    let (status, article) = send(
        app,
        json_request("POST", "/news", None, &json!({"title": "A", "category_id": cat_id})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let news_id = article["id"].as_i64().unwrap();

    // comment as U; anonymous creation is rejected
    let comment_body = json!({"content": "hi", "news_id": news_id});
    let (status, _) = send(app, json_request("POST", "/comments", None, &comment_body)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, comment) =
        send(app, json_request("POST", "/comments", Some(&token_u), &comment_body)).await?;
    assert_eq!(status, StatusCode::OK);
    let comment_id = comment["id"].as_i64().unwrap();
    let created_stamp = comment["created"].as_str().unwrap().to_string();

    // V may not touch U's comment
    let (status, _) = send(
        app,
        json_request(
            "PUT",
            &format!("/comments/{comment_id}"),
            Some(&token_v),
            &json!({"content": "hijacked"}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, unchanged) =
        send(app, bare_request("GET", &format!("/comments/{comment_id}"), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["content"], "hi");

    // U may
    let (status, updated) = send(
        app,
        json_request(
            "PUT",
            &format!("/comments/{comment_id}"),
            Some(&token_u),
            &json!({"content": "hello"}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "hello");
    let created = chrono::DateTime::parse_from_rfc3339(&created_stamp)?;
    let refreshed = chrono::DateTime::parse_from_rfc3339(updated["updated"].as_str().unwrap())?;
    assert!(refreshed > created);

    // deleting the news cascades to its comments
    let (status, _) = send(app, bare_request("DELETE", &format!("/news/{news_id}"), None)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send(app, bare_request("GET", &format!("/comments/{comment_id}"), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(app, bare_request("GET", &format!("/news/{news_id}"), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn register_login_me_flow() -> anyhow::Result<()> {
    let t = build_app().await?;
    let app = &t.app;

    let register = json!({"email": "bob@example.com", "name": "Bob", "password": "S3curePass!"});
    let (status, _) = send(app, json_request("POST", "/auth/register", None, &register)).await?;
    assert_eq!(status, StatusCode::OK);

    // duplicate email
    let (status, _) = send(app, json_request("POST", "/auth/register", None, &register)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // wrong password
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({"email": "bob@example.com", "password": "wrong-pass"}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/auth/login",
                None,
                &json!({"email": "bob@example.com", "password": "S3curePass!"}),
            ),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    };

    let (status, me) = send(app, bare_request("GET", "/auth/me", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "bob@example.com");
    assert_eq!(me["name"], "Bob");

    let (status, _) = send(app, bare_request("GET", "/auth/me", None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn category_http_crud_with_restrict_delete() -> anyhow::Result<()> {
    let t = build_app().await?;
    let app = &t.app;

    let (status, cat) =
        send(app, json_request("POST", "/categories", None, &json!({"name": "Tech"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let cat_id = cat["id"].as_i64().unwrap();
    let created_stamp = cat["created"].as_str().unwrap().to_string();

    // PATCH with only a name leaves the creation stamp alone
    let (status, patched) = send(
        app,
        json_request("PATCH", &format!("/categories/{cat_id}"), None, &json!({"name": "Sci"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "Sci");
    assert_eq!(patched["created"].as_str().unwrap(), created_stamp);

    // empty PATCH is a no-op
    let (status, unchanged) =
        send(app, json_request("PATCH", &format!("/categories/{cat_id}"), None, &json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["name"], "Sci");

    // a category with dependent news cannot be deleted
    let (status, _) = send(
        app,
        json_request("POST", "/news", None, &json!({"title": "A", "category_id": cat_id})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        send(app, bare_request("DELETE", &format!("/categories/{cat_id}"), None)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // news creation against a missing category is rejected
    let (status, _) = send(
        app,
        json_request("POST", "/news", None, &json!({"title": "B", "category_id": 999})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app, bare_request("GET", "/categories/999", None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn image_upload_replaces_references_and_delete_cleans_files() -> anyhow::Result<()> {
    let t = build_app().await?;
    let app = &t.app;

    let (_, cat) =
        send(app, json_request("POST", "/categories", None, &json!({"name": "Tech"}))).await?;
    let (_, article) = send(
        app,
        json_request(
            "POST",
            "/news",
            None,
            &json!({"title": "A", "category_id": cat["id"], "images": ["stale.png"]}),
        ),
    )
    .await?;
    let news_id = article["id"].as_i64().unwrap();

    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\nfake png bytes\r\n--{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri(format!("/news/{news_id}/image"))
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))?;
    let (status, uploaded) = send(app, req).await?;
    assert_eq!(status, StatusCode::OK);

    // the upload replaced the whole list
    let images = uploaded["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let reference = images[0].as_str().unwrap().to_string();
    assert!(reference.ends_with(".png"));
    assert!(t.media.path_for(&reference).exists());

    // the stored file is served under /media
    let (status, _) = send(app, bare_request("GET", &format!("/media/{reference}"), None)).await?;
    assert_eq!(status, StatusCode::OK);

    // deleting the article removes the stored file, best-effort
    let (status, _) = send(app, bare_request("DELETE", &format!("/news/{news_id}"), None)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!t.media.path_for(&reference).exists());
    Ok(())
}

#[tokio::test]
async fn health_endpoint_is_public() -> anyhow::Result<()> {
    let t = build_app().await?;
    let (status, body) = send(&t.app, bare_request("GET", "/health", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}
