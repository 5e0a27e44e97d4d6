use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::order::OrderDetail;
use crate::error::AppError;
use std::sync::Arc;

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.checkout_service.checkout(&user_id).await?;
    Ok(Json(order))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let items = state.order_repo.list_items(&order.id).await?;

    Ok(Json(OrderDetail { order, items }))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.order_repo.list().await?;

    let mut response = Vec::with_capacity(orders.len());
    for order in orders {
        let items = state.order_repo.list_items(&order.id).await?;
        response.push(OrderDetail { order, items });
    }

    Ok(Json(response))
}
