use crate::domain::{
    models::order::{Order, OrderItem},
    ports::OrderRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteOrderRepo {
    pool: SqlitePool,
}

impl SqliteOrderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_order(row: &SqliteRow) -> Result<Order, AppError> {
    let total_text: String = row.try_get("total_amount").map_err(AppError::Database)?;
    let total_amount = Decimal::from_str(&total_text).map_err(|_| AppError::Internal)?;

    Ok(Order {
        id: row.try_get("id").map_err(AppError::Database)?,
        user_id: row.try_get("user_id").map_err(AppError::Database)?,
        order_date: row.try_get("order_date").map_err(AppError::Database)?,
        total_amount,
    })
}

fn map_order_item(row: &SqliteRow) -> Result<OrderItem, AppError> {
    let price_text: String = row.try_get("price").map_err(AppError::Database)?;
    let price = Decimal::from_str(&price_text).map_err(|_| AppError::Internal)?;

    Ok(OrderItem {
        id: row.try_get("id").map_err(AppError::Database)?,
        order_id: row.try_get("order_id").map_err(AppError::Database)?,
        product_id: row.try_get("product_id").map_err(AppError::Database)?,
        quantity: row.try_get("quantity").map_err(AppError::Database)?,
        price,
    })
}

#[async_trait]
impl OrderRepository for SqliteOrderRepo {
    async fn create_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        cart_id: &str,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for item in items {
            let result = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - ? \
                 WHERE id = ? AND stock_quantity >= ?",
            )
                .bind(item.quantity)
                .bind(&item.product_id)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Not enough stock for product {}",
                    item.product_id
                )));
            }
        }

        let created = sqlx::query(
            "INSERT INTO orders (id, user_id, order_date, total_amount) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(order.order_date)
            .bind(order.total_amount.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)
            .and_then(|row| map_order(&row))?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price) \
                 VALUES (?, ?, ?, ?, ?)",
            )
                .bind(&item.id)
                .bind(&item.order_id)
                .bind(&item.product_id)
                .bind(item.quantity)
                .bind(item.price.to_string())
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        row.as_ref().map(map_order).transpose()
    }

    async fn list_items(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError> {
        let rows = sqlx::query("SELECT * FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        rows.iter().map(map_order_item).collect()
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY order_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        rows.iter().map(map_order).collect()
    }
}
