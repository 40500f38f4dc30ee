#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use waitlist_backend::{
    config::Config,
    database::{
        pool::{create_pool, run_migrations},
        user_store::{SqliteUserStore, UserStore},
    },
    routes, AppState,
};

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub database_url: String,
    _dir: TempDir,
}

pub async fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let database_url = format!("sqlite://{}", dir.path().join("waitlist.db").display());
    let config = Config::with_database_url(database_url.clone());

    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let store = Arc::new(SqliteUserStore::new(pool.clone()));
    TestApp {
        app: routes::router(AppState::new(store)),
        pool,
        database_url,
        _dir: dir,
    }
}

pub fn app_with_store(store: Arc<dyn UserStore>) -> Router {
    routes::router(AppState::new(store))
}

pub fn signup_request(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

pub async fn rows_for_email(pool: &SqlitePool, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("count users")
}
