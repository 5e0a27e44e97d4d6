use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
}

impl Order {
    pub fn new(user_id: String, total_amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            order_date: Utc::now(),
            total_amount,
        }
    }
}

/// Snapshot of one purchased line. The price is frozen at checkout time and
/// never recomputed from the live product.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn new(order_id: String, product_id: String, quantity: i32, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_id,
            product_id,
            quantity,
            price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
