use std::sync::Arc;
use crate::domain::ports::{
    AssetStore, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::cart_service::CartService;
use crate::domain::services::checkout_service::CheckoutService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub cart_repo: Arc<dyn CartRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub auth_service: Arc<AuthService>,
    pub cart_service: Arc<CartService>,
    pub checkout_service: Arc<CheckoutService>,
    pub asset_store: Arc<dyn AssetStore>,
}
