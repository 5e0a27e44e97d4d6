use serde::Serialize;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::models::{category::Category, product::Product, user::{Role, User}};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
}

impl ProductResponse {
    pub fn new(product: Product, category_name: Option<String>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            category_id: product.category_id,
            category_name,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub products: Vec<ProductResponse>,
}

impl CategoryResponse {
    pub fn new(category: Category, products: Vec<ProductResponse>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            image_url: category.image_url,
            products,
        }
    }
}
