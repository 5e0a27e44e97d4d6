pub mod postgres_cart_repo;
pub mod postgres_category_repo;
pub mod postgres_order_repo;
pub mod postgres_product_repo;
pub mod postgres_user_repo;
pub mod sqlite_cart_repo;
pub mod sqlite_category_repo;
pub mod sqlite_order_repo;
pub mod sqlite_product_repo;
pub mod sqlite_user_repo;
