use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::media::MediaStore;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn load_media_dir() -> String {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.media.normalize_from_env();
            cfg.media.dir
        }
        Err(_) => env::var("MEDIA_DIR").unwrap_or_else(|_| "data/media".to_string()),
    }
}

/// Prefer pool settings from config.toml; fall back to DATABASE_URL.
async fn connect_db() -> anyhow::Result<DatabaseConnection> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => models::db::connect_with(&cfg.database).await,
        Err(_) => models::db::connect().await,
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection, schema applied on boot
    let db = connect_db().await?;
    migration::Migrator::up(&db, None).await?;

    // File storage for news images
    let media = Arc::new(MediaStore::new(load_media_dir()).await?);

    // JWT secret
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    if jwt_secret.trim().is_empty() {
        return Err(StartupError::InvalidConfig("JWT_SECRET must not be empty".into()).into());
    }

    let state = auth::ServerState { db, auth: auth::ServerAuthConfig { jwt_secret }, media };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting newsdesk server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
