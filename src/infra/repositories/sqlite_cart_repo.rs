use crate::domain::{
    models::cart::{Cart, CartItem, CartLine},
    ports::CartRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteCartRepo {
    pool: SqlitePool,
}

impl SqliteCartRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_line(row: &SqliteRow) -> Result<CartLine, AppError> {
    let price_text: String = row.try_get("unit_price").map_err(AppError::Database)?;
    let unit_price = Decimal::from_str(&price_text).map_err(|_| AppError::Internal)?;

    Ok(CartLine {
        item_id: row.try_get("item_id").map_err(AppError::Database)?,
        product_id: row.try_get("product_id").map_err(AppError::Database)?,
        product_name: row.try_get("product_name").map_err(AppError::Database)?,
        quantity: row.try_get("quantity").map_err(AppError::Database)?,
        unit_price,
        stock_quantity: row.try_get("stock_quantity").map_err(AppError::Database)?,
    })
}

#[async_trait]
impl CartRepository for SqliteCartRepo {
    async fn create(&self, cart: &Cart) -> Result<Cart, AppError> {
        sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (id, user_id, created_at) VALUES (?, ?, ?) RETURNING *",
        )
            .bind(&cart.id)
            .bind(&cart.user_id)
            .bind(cart.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Cart>, AppError> {
        sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_item(&self, cart_id: &str, item_id: &str) -> Result<Option<CartItem>, AppError> {
        sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE cart_id = ? AND id = ?",
        )
            .bind(cart_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_item_by_product(
        &self,
        cart_id: &str,
        product_id: &str,
    ) -> Result<Option<CartItem>, AppError> {
        sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE cart_id = ? AND product_id = ?",
        )
            .bind(cart_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_lines(&self, cart_id: &str) -> Result<Vec<CartLine>, AppError> {
        let rows = sqlx::query(
            "SELECT ci.id AS item_id, ci.product_id, p.name AS product_name, ci.quantity, \
             p.price AS unit_price, p.stock_quantity \
             FROM cart_items ci JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = ? ORDER BY p.name ASC",
        )
            .bind(cart_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        rows.iter().map(map_line).collect()
    }

    async fn add_item(&self, item: &CartItem) -> Result<CartItem, AppError> {
        sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (id, cart_id, product_id, quantity) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
            .bind(&item.id)
            .bind(&item.cart_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_item_quantity(&self, item_id: &str, quantity: i32) -> Result<CartItem, AppError> {
        sqlx::query_as::<_, CartItem>(
            "UPDATE cart_items SET quantity = ? WHERE id = ? RETURNING *",
        )
            .bind(quantity)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    async fn clear(&self, cart_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
            .bind(cart_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
