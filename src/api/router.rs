use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, cart, category, health, order, product};
use tower_http::{
    classify::ServerErrorsFailureClass,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh_token))

        // Catalog
        .route("/api/categories", get(category::list_categories).post(category::create_category))
        .route("/api/categories/{id}", get(category::get_category).put(category::update_category).delete(category::delete_category))
        .route("/api/products", get(product::list_products).post(product::create_product))
        .route("/api/products/{id}", get(product::get_product).put(product::update_product).delete(product::delete_product))
        .route("/api/products/{id}/stock", put(product::add_stock))

        // Cart
        .route("/api/cart/{user_id}", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/cart/{user_id}/add", post(cart::add_item))
        .route("/api/cart/{user_id}/update/{item_id}", put(cart::update_quantity))
        .route("/api/cart/{user_id}/remove/{item_id}", delete(cart::remove_item))

        // Orders
        .route("/api/orders/checkout/{user_id}", post(order::checkout))
        .route("/api/orders/{id}", get(order::get_order))
        .route("/api/orders", get(order::list_orders))

        // Stored catalog images
        .nest_service("/images", ServeDir::new(&state.config.asset_root))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
