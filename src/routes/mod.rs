pub mod docs;
pub mod health;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/users", post(users::create_user))
        .route("/api/openapi.json", get(docs::openapi))
        .with_state(state)
}
