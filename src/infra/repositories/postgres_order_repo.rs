use crate::domain::{
    models::order::{Order, OrderItem},
    ports::OrderRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOrderRepo {
    pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepo {
    async fn create_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        cart_id: &str,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for item in items {
            // Conditional decrement: zero rows means someone got there first,
            // and dropping the transaction rolls back every prior decrement.
            let result = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $1 \
                 WHERE id = $2 AND stock_quantity >= $1",
            )
                .bind(item.quantity)
                .bind(&item.product_id)
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

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, order_date, total_amount) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(order.order_date)
            .bind(order.total_amount)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
                .bind(&item.id)
                .bind(&item.order_id)
                .bind(&item.product_id)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_items(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY order_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
