use crate::domain::{models::product::Product, ports::ProductRepository};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// SQLite has no decimal type; prices are stored as canonical decimal text
// and mapped by hand.
fn map_product(row: &SqliteRow) -> Result<Product, AppError> {
    let price_text: String = row.try_get("price").map_err(AppError::Database)?;
    let price = Decimal::from_str(&price_text).map_err(|_| AppError::Internal)?;

    Ok(Product {
        id: row.try_get("id").map_err(AppError::Database)?,
        name: row.try_get("name").map_err(AppError::Database)?,
        description: row.try_get("description").map_err(AppError::Database)?,
        price,
        stock_quantity: row.try_get("stock_quantity").map_err(AppError::Database)?,
        image_url: row.try_get("image_url").map_err(AppError::Database)?,
        category_id: row.try_get("category_id").map_err(AppError::Database)?,
        created_at: row.try_get("created_at").map_err(AppError::Database)?,
    })
}

#[async_trait]
impl ProductRepository for SqliteProductRepo {
    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query(
            "INSERT INTO products (id, name, description, price, stock_quantity, image_url, category_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.to_string())
            .bind(product.stock_quantity)
            .bind(&product.image_url)
            .bind(&product.category_id)
            .bind(product.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        map_product(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        row.as_ref().map(map_product).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        rows.iter().map(map_product).collect()
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ?, stock_quantity = ?, \
             image_url = ?, category_id = ? WHERE id = ? RETURNING *",
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.to_string())
            .bind(product.stock_quantity)
            .bind(&product.image_url)
            .bind(&product.category_id)
            .bind(&product.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        map_product(&row)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn add_stock(&self, id: &str, quantity: i32) -> Result<Product, AppError> {
        let row = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity + ? WHERE id = ? RETURNING *",
        )
            .bind(quantity)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        map_product(&row)
    }
}
