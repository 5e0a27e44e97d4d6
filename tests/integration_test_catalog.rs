mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{multipart_form, parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_category_crud() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let category = app.create_category(&admin, "Electronics").await;
    let category_id = category["id"].as_str().unwrap();
    assert_eq!(category["name"], "Electronics");

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/categories")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = parse_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Electronics");

    let (content_type, body) = multipart_form(&[("name", "Gadgets")], None);
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/categories/{category_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["name"], "Gadgets");

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/categories/{category_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/categories/{category_id}"))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_round_trip_preserves_price_stock_and_category() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let category = app.create_category(&admin, "Books").await;
    let category_id = category["id"].as_str().unwrap();

    let created = app.create_product(&admin, "Rust in Action", "19.99", 5, Some(category_id)).await;
    let product_id = created["id"].as_str().unwrap();

    let fetched = app.get_product(product_id).await;
    assert_eq!(fetched["price"], "19.99");
    assert_eq!(fetched["stock_quantity"], 5);
    assert_eq!(fetched["category_id"], category_id);
    assert_eq!(fetched["category_name"], "Books");
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let (content_type, body) = multipart_form(
        &[
            ("name", "Orphan"),
            ("description", "No home"),
            ("price", "1.00"),
            ("stock_quantity", "1"),
            ("category_id", "no-such-category"),
        ],
        None,
    );

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_mutations_require_admin_role() {
    let app = TestApp::new().await;

    app.register("shopper", "shopper-password").await;
    let customer = app.login("shopper", "shopper-password").await;

    let (content_type, body) = multipart_form(&[("name", "Nope")], None);
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/categories")
            .header(header::AUTHORIZATION, format!("Bearer {}", customer.access_token))
            .header(header::CONTENT_TYPE, content_type.clone())
            .body(Body::from(body.clone()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/categories")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_image_upload_and_cleanup_on_delete() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let (content_type, body) = multipart_form(
        &[
            ("name", "Camera"),
            ("description", "Takes pictures"),
            ("price", "250.00"),
            ("stock_quantity", "3"),
        ],
        Some(("camera.png", b"fake png bytes")),
    );

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let product = parse_body(response).await;
    let image_url = product["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/images/"));
    assert!(image_url.ends_with(".png"));

    let filename = image_url.rsplit('/').next().unwrap();
    let stored_path = app.asset_root.join(filename);
    assert!(stored_path.exists());

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/products/{}", product["id"].as_str().unwrap()))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!stored_path.exists());
}

#[tokio::test]
async fn test_invalid_image_extension_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let (content_type, body) = multipart_form(
        &[
            ("name", "Sneaky"),
            ("description", "Not an image"),
            ("price", "1.00"),
            ("stock_quantity", "1"),
        ],
        Some(("malware.exe", b"MZ")),
    );

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The rejected product was never persisted.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/products")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    let list = parse_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_stock_is_additive() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let product = app.create_product(&admin, "Widget", "2.50", 5, None).await;
    let product_id = product["id"].as_str().unwrap();

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/products/{product_id}/stock"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"stock_quantity": 3}).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["stock_quantity"], 8);

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/products/{product_id}/stock"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"stock_quantity": 0}).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_replaces_image_and_deletes_old_file() {
    let app = TestApp::new().await;
    let admin = app.admin_tokens().await;

    let (content_type, body) = multipart_form(
        &[
            ("name", "Poster"),
            ("description", "Wall art"),
            ("price", "9.99"),
            ("stock_quantity", "10"),
        ],
        Some(("v1.jpg", b"first image")),
    );
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();
    let product = parse_body(response).await;
    let product_id = product["id"].as_str().unwrap();
    let old_name = product["image_url"].as_str().unwrap().rsplit('/').next().unwrap().to_string();

    let (content_type, body) = multipart_form(&[("price", "12.50")], Some(("v2.jpg", b"second image")));
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/products/{product_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin.access_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = parse_body(response).await;
    assert_eq!(updated["price"], "12.50");
    assert_eq!(updated["name"], "Poster");
    let new_name = updated["image_url"].as_str().unwrap().rsplit('/').next().unwrap().to_string();
    assert_ne!(new_name, old_name);

    assert!(!app.asset_root.join(&old_name).exists());
    assert!(app.asset_root.join(&new_name).exists());
}
