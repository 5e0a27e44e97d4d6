use axum::{extract::{Multipart, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::responses::{CategoryResponse, ProductResponse};
use crate::api::handlers::forms::read_form;
use crate::domain::models::{category::Category, product::Product};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_repo.list().await?;
    let products = state.product_repo.list().await?;

    let mut by_category: HashMap<String, Vec<Product>> = HashMap::new();
    for product in products {
        if let Some(category_id) = product.category_id.clone() {
            by_category.entry(category_id).or_default().push(product);
        }
    }

    let response: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|category| {
            let products = by_category
                .remove(&category.id)
                .unwrap_or_default()
                .into_iter()
                .map(|p| ProductResponse::new(p, Some(category.name.clone())))
                .collect();
            CategoryResponse::new(category, products)
        })
        .collect();

    Ok(Json(response))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let products = state.product_repo.list().await?
        .into_iter()
        .filter(|p| p.category_id.as_deref() == Some(category.id.as_str()))
        .map(|p| ProductResponse::new(p, Some(category.name.clone())))
        .collect();

    Ok(Json(CategoryResponse::new(category, products)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(&mut multipart).await?;
    let name = form.require("name")?;

    let mut category = Category::new(name);
    if let Some(image) = form.image {
        category.image_url = Some(state.asset_store.store(&image.filename, &image.bytes).await?);
    }

    let created = state.category_repo.create(&category).await?;

    info!("Category created: {}", created.id);

    Ok(Json(CategoryResponse::new(created, Vec::new())))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let form = read_form(&mut multipart).await?;
    category.name = form.require("name")?;

    if let Some(image) = form.image {
        // Replacing the image; losing the old file is disk cleanup, not data
        // integrity, so a failed delete only logs.
        if let Some(old_url) = category.image_url.take() {
            if let Err(e) = state.asset_store.delete(&old_url).await {
                warn!("Failed to delete old category image {}: {:?}", old_url, e);
            }
        }
        category.image_url = Some(state.asset_store.store(&image.filename, &image.bytes).await?);
    }

    let updated = state.category_repo.update(&category).await?;

    info!("Category updated: {}", updated.id);

    Ok(Json(CategoryResponse::new(updated, Vec::new())))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    if let Some(image_url) = &category.image_url {
        if let Err(e) = state.asset_store.delete(image_url).await {
            warn!("Failed to delete category image {}: {:?}", image_url, e);
        }
    }

    state.category_repo.delete(&category.id).await?;

    info!("Category deleted: {}", category.id);

    Ok(StatusCode::NO_CONTENT)
}
