use std::sync::Arc;
use crate::domain::models::cart::{Cart, CartItem, CartView};
use crate::domain::ports::{CartRepository, ProductRepository};
use crate::error::AppError;

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    pub async fn get_cart(&self, user_id: &str) -> Result<CartView, AppError> {
        let cart = self.carts.find_by_user(user_id).await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        self.view(cart).await
    }

    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> Result<CartView, AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantity must be greater than zero".to_string()));
        }

        let product = self.products.find_by_id(product_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {product_id} does not exist")))?;

        let cart = match self.carts.find_by_user(user_id).await? {
            Some(cart) => cart,
            None => self.carts.create(&Cart::new(user_id.to_string())).await?,
        };

        match self.carts.find_item_by_product(&cart.id, product_id).await? {
            Some(existing) => {
                // The merged line must still fit in what is on the shelf.
                let merged = existing.quantity + quantity;
                if merged > product.stock_quantity {
                    return Err(AppError::Conflict(format!(
                        "Insufficient stock for {}. Only {} items available.",
                        product.name, product.stock_quantity
                    )));
                }
                self.carts.update_item_quantity(&existing.id, merged).await?;
            }
            None => {
                if quantity > product.stock_quantity {
                    return Err(AppError::Conflict(format!(
                        "Insufficient stock for {}. Only {} items available.",
                        product.name, product.stock_quantity
                    )));
                }
                self.carts
                    .add_item(&CartItem::new(cart.id.clone(), product_id.to_string(), quantity))
                    .await?;
            }
        }

        self.view(cart).await
    }

    pub async fn update_quantity(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: i32,
    ) -> Result<CartItem, AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantity must be greater than zero".to_string()));
        }

        let cart = self.carts.find_by_user(user_id).await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let item = self.carts.find_item(&cart.id, item_id).await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Cart item with ID {item_id} does not exist in the user's cart"))
            })?;

        let product = self.products.find_by_id(&item.product_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {} does not exist", item.product_id)))?;

        // Decreases are always permitted; only the increase is stock-checked.
        let increase = quantity - item.quantity;
        if increase > 0 && increase > product.stock_quantity {
            return Err(AppError::Conflict(format!(
                "Insufficient stock. Only {} items available.",
                product.stock_quantity
            )));
        }

        self.carts.update_item_quantity(&item.id, quantity).await
    }

    pub async fn remove_item(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        let cart = self.carts.find_by_user(user_id).await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let item = self.carts.find_item(&cart.id, item_id).await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Cart item with ID {item_id} does not exist in the user's cart"))
            })?;

        self.carts.delete_item(&item.id).await
    }

    pub async fn clear_cart(&self, user_id: &str) -> Result<(), AppError> {
        let cart = self.carts.find_by_user(user_id).await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let lines = self.carts.list_lines(&cart.id).await?;
        if lines.is_empty() {
            return Err(AppError::Validation("Cart is already empty".to_string()));
        }

        self.carts.clear(&cart.id).await
    }

    async fn view(&self, cart: Cart) -> Result<CartView, AppError> {
        let items = self.carts.list_lines(&cart.id).await?;
        Ok(CartView { id: cart.id, user_id: cart.user_id, items })
    }
}
