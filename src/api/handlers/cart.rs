use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AddCartItemRequest, UpdateCartItemQuantityRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cart = state.cart_service.get_cart(&user_id).await?;
    Ok(Json(cart))
}

pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddCartItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cart = state.cart_service
        .add_item(&user_id, &payload.product_id, payload.quantity)
        .await?;

    info!("Added {} x {} to cart of user {}", payload.quantity, payload.product_id, user_id);

    Ok(Json(cart))
}

pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Path((user_id, item_id)): Path<(String, String)>,
    Json(payload): Json<UpdateCartItemQuantityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.cart_service
        .update_quantity(&user_id, &item_id, payload.quantity)
        .await?;

    info!("Cart item {} updated to quantity {}", item.id, item.quantity);

    Ok(Json(item))
}

pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.cart_service.remove_item(&user_id, &item_id).await?;

    info!("Cart item {} removed for user {}", item_id, user_id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.cart_service.clear_cart(&user_id).await?;

    info!("Cart cleared for user {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
