mod common;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use waitlist_backend::{
    config::Config,
    database::pool::create_pool,
    database::user_store::{StoreError, UserStore},
    models::user::{NewUser, User},
};

use common::{app_with_store, rows_for_email, send, setup_app, signup_request};

const CONFLICT: &str = "This email is already registered.";
const UNEXPECTED: &str = "An unexpected error occurred.";

#[tokio::test]
async fn signup_is_created() {
    let t = setup_app().await;

    let body = json!({ "name": "Al", "email": "al@example.com" });
    let (status, resp) = send(&t.app, signup_request(body.to_string())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["user"]["email"], "al@example.com");
    assert_eq!(resp["user"]["name"], "Al");
    assert!(!resp["user"]["id"].as_str().unwrap().is_empty());
    assert!(resp["user"].get("created_at").is_none());
    assert_eq!(rows_for_email(&t.pool, "al@example.com").await, 1);
}

#[tokio::test]
async fn created_signup_is_visible_to_other_connections() {
    let t = setup_app().await;
    let observer = create_pool(&Config::with_database_url(t.database_url.clone()))
        .await
        .expect("observer pool");

    for i in 0..50 {
        let email = format!("seen{}@example.com", i);
        let body = json!({ "name": "Seen", "email": email });
        let (status, _) = send(&t.app, signup_request(body.to_string())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(rows_for_email(&observer, &email).await, 1, "{}", email);
    }

    observer.close().await;
}

#[tokio::test]
async fn absent_name_is_returned_as_null() {
    let t = setup_app().await;

    let (status, resp) = send(
        &t.app,
        signup_request(json!({ "email": "noname@example.com" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(resp["user"]["name"].is_null());
    assert_eq!(resp["user"]["email"], "noname@example.com");
}

#[tokio::test]
async fn every_signup_gets_a_fresh_id() {
    let t = setup_app().await;

    let mut ids = HashSet::new();
    for i in 0..5 {
        let body = json!({ "email": format!("user{}@example.com", i) });
        let (status, resp) = send(&t.app, signup_request(body.to_string())).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.insert(resp["user"]["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn short_name_is_rejected() {
    let t = setup_app().await;

    let body = json!({ "name": "A", "email": "al@example.com" });
    let (status, resp) = send(&t.app, signup_request(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let violations = resp.as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["path"], json!(["name"]));
    assert_eq!(
        violations[0]["message"],
        "Name must be at least 2 characters long."
    );
    assert_eq!(rows_for_email(&t.pool, "al@example.com").await, 0);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let t = setup_app().await;

    let body = json!({ "name": "Bo", "email": "not-an-email" });
    let (status, resp) = send(&t.app, signup_request(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let violations = resp.as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["path"], json!(["email"]));
    assert_eq!(violations[0]["message"], "Please enter a valid email address.");
}

#[tokio::test]
async fn badly_dotted_email_is_rejected() {
    let t = setup_app().await;

    for email in ["a..b@example.com", ".al@example.com", "al@localhost"] {
        let body = json!({ "email": email });
        let (status, resp) = send(&t.app, signup_request(body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", email);
        let violations = resp.as_array().unwrap();
        assert_eq!(violations.len(), 1, "{}", email);
        assert_eq!(violations[0]["path"], json!(["email"]));
        assert_eq!(violations[0]["message"], "Please enter a valid email address.");
        assert_eq!(rows_for_email(&t.pool, email).await, 0);
    }
}

#[tokio::test]
async fn both_violations_are_reported_and_repeatable() {
    let t = setup_app().await;
    let body = json!({ "name": "A", "email": "nope" }).to_string();

    let (first_status, first) = send(&t.app, signup_request(body.clone())).await;
    let (second_status, second) = send(&t.app, signup_request(body)).await;

    assert_eq!(first_status, StatusCode::BAD_REQUEST);
    assert_eq!(second_status, StatusCode::BAD_REQUEST);
    assert_eq!(first, second);
    let messages: Vec<&str> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["message"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Name must be at least 2 characters long.",
            "Please enter a valid email address."
        ]
    );
}

#[tokio::test]
async fn non_object_payload_is_rejected() {
    let t = setup_app().await;

    let (status, resp) = send(&t.app, signup_request("\"al@example.com\"")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp[0]["code"], "invalid_type");
}

#[tokio::test]
async fn unparseable_body_is_an_unexpected_error() {
    let t = setup_app().await;

    let (status, resp) = send(&t.app, signup_request("{\"email\": ")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, json!({ "message": UNEXPECTED }));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let t = setup_app().await;
    let body = json!({ "name": "Al", "email": "al@example.com" }).to_string();

    let (first, _) = send(&t.app, signup_request(body.clone())).await;
    let (second, resp) = send(&t.app, signup_request(body)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(resp, json!({ "message": CONFLICT }));
    assert_eq!(rows_for_email(&t.pool, "al@example.com").await, 1);
}

#[tokio::test]
async fn duplicate_email_with_different_case_conflicts() {
    let t = setup_app().await;

    let (first, _) = send(
        &t.app,
        signup_request(json!({ "email": "Al@Example.com" }).to_string()),
    )
    .await;
    let (second, resp) = send(
        &t.app,
        signup_request(json!({ "email": "al@example.com" }).to_string()),
    )
    .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(resp["message"], CONFLICT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_duplicates_insert_exactly_once() {
    let t = setup_app().await;
    let body = json!({ "name": "Race", "email": "race@example.com" }).to_string();

    let first = tokio::spawn({
        let app = t.app.clone();
        let body = body.clone();
        async move { send(&app, signup_request(body)).await.0 }
    });
    let second = tokio::spawn({
        let app = t.app.clone();
        async move { send(&app, signup_request(body)).await.0 }
    });

    let mut statuses = vec![first.await.unwrap().as_u16(), second.await.unwrap().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409]);
    assert_eq!(rows_for_email(&t.pool, "race@example.com").await, 1);
}

struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn insert_user(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::Protocol(
            "disk image is malformed at page 42".to_string(),
        )))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn storage_fault_is_opaque() {
    let app = app_with_store(Arc::new(FailingStore));

    let body = json!({ "name": "Al", "email": "al@example.com" });
    let (status, resp) = send(&app, signup_request(body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, json!({ "message": UNEXPECTED }));
    assert!(!resp.to_string().contains("malformed"));
}

#[tokio::test]
async fn health_reports_store_reachability() {
    let t = setup_app().await;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "ok");

    let app = app_with_store(Arc::new(FailingStore));
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = send(&app, req).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp["status"], "unavailable");
}

#[tokio::test]
async fn openapi_document_lists_signup_route() {
    let t = setup_app().await;
    let req = Request::builder()
        .uri("/api/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = send(&t.app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(resp["paths"]["/api/users"]["post"].is_object());
}
