pub mod auth_service;
pub mod cart_service;
pub mod checkout_service;
