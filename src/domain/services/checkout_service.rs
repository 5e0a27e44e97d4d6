use std::sync::Arc;
use crate::domain::models::order::{Order, OrderDetail, OrderItem};
use crate::domain::ports::{CartRepository, OrderRepository};
use crate::error::AppError;
use rust_decimal::Decimal;
use tracing::info;

pub struct CheckoutService {
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl CheckoutService {
    pub fn new(carts: Arc<dyn CartRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { carts, orders }
    }

    pub async fn checkout(&self, user_id: &str) -> Result<OrderDetail, AppError> {
        let cart = self.carts.find_by_user(user_id).await?
            .ok_or_else(|| AppError::Validation("Cart is empty or does not exist".to_string()))?;

        let lines = self.carts.list_lines(&cart.id).await?;
        if lines.is_empty() {
            return Err(AppError::Validation("Cart is empty or does not exist".to_string()));
        }

        // Advisory pass naming the offending product. The transaction below
        // re-checks each decrement, so a concurrent sale cannot slip through.
        for line in &lines {
            if line.quantity > line.stock_quantity {
                return Err(AppError::Conflict(format!(
                    "Not enough stock for {}. Only {} left.",
                    line.product_name, line.stock_quantity
                )));
            }
        }

        let total: Decimal = lines
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.unit_price)
            .sum();

        let order = Order::new(user_id.to_string(), total);
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| {
                OrderItem::new(order.id.clone(), line.product_id.clone(), line.quantity, line.unit_price)
            })
            .collect();

        let created = self.orders.create_checkout(&order, &items, &cart.id).await?;

        info!("Checkout completed: order {} for user {} ({})", created.id, user_id, created.total_amount);

        Ok(OrderDetail { order: created, items })
    }
}
