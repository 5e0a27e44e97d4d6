use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CartItem {
    pub id: String,
    pub cart_id: String,
    pub product_id: String,
    pub quantity: i32,
}

impl CartItem {
    pub fn new(cart_id: String, product_id: String, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cart_id,
            product_id,
            quantity,
        }
    }
}

/// A cart item joined with the product it references.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct CartLine {
    pub item_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(skip_serializing)]
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartLine>,
}
