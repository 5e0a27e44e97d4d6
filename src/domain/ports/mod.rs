use crate::domain::models::{
    cart::{Cart, CartItem, CartLine},
    category::Category,
    order::{Order, OrderItem},
    product::Product,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>, AppError>;
    async fn store_refresh_token(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError>;
    async fn list(&self) -> Result<Vec<Category>, AppError>;
    async fn update(&self, category: &Category) -> Result<Category, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError>;
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    async fn update(&self, product: &Product) -> Result<Product, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn add_stock(&self, id: &str, quantity: i32) -> Result<Product, AppError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn create(&self, cart: &Cart) -> Result<Cart, AppError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Cart>, AppError>;
    async fn find_item(&self, cart_id: &str, item_id: &str) -> Result<Option<CartItem>, AppError>;
    async fn find_item_by_product(
        &self,
        cart_id: &str,
        product_id: &str,
    ) -> Result<Option<CartItem>, AppError>;
    async fn list_lines(&self, cart_id: &str) -> Result<Vec<CartLine>, AppError>;
    async fn add_item(&self, item: &CartItem) -> Result<CartItem, AppError>;
    async fn update_item_quantity(&self, item_id: &str, quantity: i32) -> Result<CartItem, AppError>;
    async fn delete_item(&self, item_id: &str) -> Result<(), AppError>;
    async fn clear(&self, cart_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists the order, its item snapshots, the stock decrements and the
    /// cart clearing as a single transaction. Each decrement is conditional
    /// on sufficient stock; a failed condition aborts the whole checkout.
    async fn create_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        cart_id: &str,
    ) -> Result<Order, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError>;
    async fn list_items(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError>;
    async fn list(&self) -> Result<Vec<Order>, AppError>;
}

/// External asset storage for catalog images. Implementations own the
/// filesystem layout; callers only see URLs.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, AppError>;
    async fn delete(&self, url: &str) -> Result<(), AppError>;
}
