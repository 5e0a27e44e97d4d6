use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewProductParams {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<String>,
}

impl Product {
    pub fn new(params: NewProductParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            price: params.price,
            stock_quantity: params.stock_quantity,
            image_url: None,
            category_id: params.category_id,
            created_at: Utc::now(),
        }
    }
}
