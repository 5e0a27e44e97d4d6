use axum::{extract::{Multipart, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::AddStockRequest;
use crate::api::dtos::responses::ProductResponse;
use crate::api::handlers::forms::{read_form, FormData};
use crate::domain::models::product::{NewProductParams, Product};
use crate::error::AppError;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

fn parse_price(value: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(value).map_err(|_| AppError::Validation("Invalid price".to_string()))
}

fn parse_quantity(value: &str) -> Result<i32, AppError> {
    value.parse::<i32>().map_err(|_| AppError::Validation("Invalid stock quantity".to_string()))
}

/// An empty `category_id` form value means "no category".
fn category_id_field(form: &FormData) -> Option<String> {
    form.get("category_id").filter(|v| !v.is_empty()).map(str::to_string)
}

async fn require_category_exists(state: &AppState, category_id: &str) -> Result<(), AppError> {
    state.category_repo.find_by_id(category_id).await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {category_id} does not exist")))
}

async fn category_name(state: &AppState, category_id: Option<&str>) -> Result<Option<String>, AppError> {
    match category_id {
        Some(id) => Ok(state.category_repo.find_by_id(id).await?.map(|c| c.name)),
        None => Ok(None),
    }
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_repo.list().await?;
    let categories = state.category_repo.list().await?;

    let names: HashMap<String, String> = categories
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let response: Vec<ProductResponse> = products
        .into_iter()
        .map(|p| {
            let category_name = p.category_id.as_ref().and_then(|id| names.get(id).cloned());
            ProductResponse::new(p, category_name)
        })
        .collect();

    Ok(Json(response))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let category_name = category_name(&state, product.category_id.as_deref()).await?;

    Ok(Json(ProductResponse::new(product, category_name)))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(&mut multipart).await?;

    let stock_quantity = parse_quantity(&form.require("stock_quantity")?)?;
    if stock_quantity < 0 {
        return Err(AppError::Validation("Stock quantity must not be negative".to_string()));
    }

    let category_id = category_id_field(&form);
    if let Some(id) = &category_id {
        require_category_exists(&state, id).await?;
    }

    let mut product = Product::new(NewProductParams {
        name: form.require("name")?,
        description: form.require("description")?,
        price: parse_price(&form.require("price")?)?,
        stock_quantity,
        category_id,
    });

    if let Some(image) = form.image {
        info!("Processing image upload: {} ({} bytes)", image.filename, image.bytes.len());
        product.image_url = Some(state.asset_store.store(&image.filename, &image.bytes).await?);
    }

    let created = state.product_repo.create(&product).await?;
    let category_name = category_name(&state, created.category_id.as_deref()).await?;

    info!("Product created: {}", created.id);

    Ok(Json(ProductResponse::new(created, category_name)))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut product = state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let form = read_form(&mut multipart).await?;

    if let Some(value) = form.get("name") {
        product.name = value.to_string();
    }
    if let Some(value) = form.get("description") {
        product.description = value.to_string();
    }
    if let Some(value) = form.get("price") {
        product.price = parse_price(value)?;
    }
    if let Some(value) = form.get("stock_quantity") {
        let stock_quantity = parse_quantity(value)?;
        if stock_quantity < 0 {
            return Err(AppError::Validation("Stock quantity must not be negative".to_string()));
        }
        product.stock_quantity = stock_quantity;
    }
    if form.get("category_id").is_some() {
        let category_id = category_id_field(&form);
        if let Some(id) = &category_id {
            require_category_exists(&state, id).await?;
        }
        product.category_id = category_id;
    }

    if let Some(image) = form.image {
        info!("Processing image update: {} ({} bytes)", image.filename, image.bytes.len());
        if let Some(old_url) = product.image_url.take() {
            if let Err(e) = state.asset_store.delete(&old_url).await {
                warn!("Failed to delete old product image {}: {:?}", old_url, e);
            }
        }
        product.image_url = Some(state.asset_store.store(&image.filename, &image.bytes).await?);
    }

    let updated = state.product_repo.update(&product).await?;
    let category_name = category_name(&state, updated.category_id.as_deref()).await?;

    info!("Product updated: {}", updated.id);

    Ok(Json(ProductResponse::new(updated, category_name)))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if let Some(image_url) = &product.image_url {
        if let Err(e) = state.asset_store.delete(image_url).await {
            warn!("Failed to delete product image {}: {:?}", image_url, e);
        }
    }

    state.product_repo.delete(&product.id).await?;

    info!("Product deleted: {}", product.id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_stock(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<AddStockRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.stock_quantity <= 0 {
        return Err(AppError::Validation("Stock quantity must be greater than zero".to_string()));
    }

    let updated = state.product_repo.add_stock(&id, payload.stock_quantity).await?;
    let category_name = category_name(&state, updated.category_id.as_deref()).await?;

    info!("Stock replenished for product {}: now {}", updated.id, updated.stock_quantity);

    Ok(Json(ProductResponse::new(updated, category_name)))
}
