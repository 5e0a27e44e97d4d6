mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_creates_user_and_empty_cart() {
    let app = TestApp::new().await;

    let user = app.register("alice", "correct horse battery staple").await;
    assert_eq!(user["username"], "alice");
    assert_eq!(user["role"], "Customer");
    let user_id = user["id"].as_str().unwrap();
    assert!(!user_id.is_empty());
    assert!(user.get("password_hash").is_none());

    let response = app.get_cart(user_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cart = parse_body(response).await;
    assert_eq!(cart["user_id"], user_id);
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_duplicate_register_rejected_without_side_effects() {
    let app = TestApp::new().await;

    app.register("bob", "password-one").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "bob", "password": "password-two"}).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let (carts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM carts")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
    assert_eq!(carts, 1);
}

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let app = TestApp::new().await;

    app.register("carol", "right-password").await;

    for payload in [
        json!({"username": "carol", "password": "wrong-password"}),
        json!({"username": "nobody", "password": "right-password"}),
    ] {
        let response = app.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        ).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = parse_body(response).await;
        assert_eq!(body["error"], "Unauthorized");
        assert!(body.get("accessToken").is_none());
    }
}

#[tokio::test]
async fn test_login_issues_token_pair() {
    let app = TestApp::new().await;

    app.register("dave", "hunter2hunter2").await;
    let tokens = app.login("dave", "hunter2hunter2").await;

    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());

    // A customer token authenticates but does not authorize admin endpoints.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/orders")
            .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/orders")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let app = TestApp::new().await;

    let user = app.register("erin", "some-long-password").await;
    let user_id = user["id"].as_str().unwrap();
    let tokens = app.login("erin", "some-long-password").await;

    let refresh = |token: String| {
        let router = app.router.clone();
        let user_id = user_id.to_string();
        async move {
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/refresh-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"userId": user_id, "refreshToken": token}).to_string()))
                    .unwrap(),
            ).await.unwrap()
        }
    };

    let response = refresh(tokens.refresh_token.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    let rotated = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, tokens.refresh_token);
    assert!(!body["accessToken"].as_str().unwrap().is_empty());

    // The old token was spent by the rotation.
    let response = refresh(tokens.refresh_token.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated token is live.
    let response = refresh(rotated).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_refresh_token_rejected() {
    let app = TestApp::new().await;

    app.register("frank", "yet-another-password").await;
    let tokens = app.login("frank", "yet-another-password").await;

    sqlx::query("UPDATE users SET refresh_token_expires_at = ? WHERE username = ?")
        .bind(Utc::now() - Duration::hours(1))
        .bind("frank")
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/refresh-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"userId": "frank", "refreshToken": tokens.refresh_token}).to_string(),
            ))
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_blank_credentials() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "  ", "password": ""}).to_string()))
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
