use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub asset_root: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "https://api.commerce.local".to_string()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "commerce-frontend".to_string()),
            asset_root: env::var("ASSET_ROOT").unwrap_or_else(|_| "./assets".to_string()),
        }
    }
}
