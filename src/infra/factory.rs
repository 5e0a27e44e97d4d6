use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::cart_service::CartService;
use crate::domain::services::checkout_service::CheckoutService;
use crate::infra::assets::fs_asset_store::FsAssetStore;
use crate::infra::repositories::{
    postgres_cart_repo::PostgresCartRepo, postgres_category_repo::PostgresCategoryRepo,
    postgres_order_repo::PostgresOrderRepo, postgres_product_repo::PostgresProductRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_cart_repo::SqliteCartRepo, sqlite_category_repo::SqliteCategoryRepo,
    sqlite_order_repo::SqliteOrderRepo, sqlite_product_repo::SqliteProductRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let asset_store = Arc::new(FsAssetStore::new(&config.asset_root));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        let category_repo = Arc::new(PostgresCategoryRepo::new(pool.clone()));
        let product_repo = Arc::new(PostgresProductRepo::new(pool.clone()));
        let cart_repo = Arc::new(PostgresCartRepo::new(pool.clone()));
        let order_repo = Arc::new(PostgresOrderRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(user_repo.clone(), cart_repo.clone(), config.clone()));
        let cart_service = Arc::new(CartService::new(cart_repo.clone(), product_repo.clone()));
        let checkout_service = Arc::new(CheckoutService::new(cart_repo.clone(), order_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            category_repo,
            product_repo,
            cart_repo,
            order_repo,
            auth_service,
            cart_service,
            checkout_service,
            asset_store,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let category_repo = Arc::new(SqliteCategoryRepo::new(pool.clone()));
        let product_repo = Arc::new(SqliteProductRepo::new(pool.clone()));
        let cart_repo = Arc::new(SqliteCartRepo::new(pool.clone()));
        let order_repo = Arc::new(SqliteOrderRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(user_repo.clone(), cart_repo.clone(), config.clone()));
        let cart_service = Arc::new(CartService::new(cart_repo.clone(), product_repo.clone()));
        let checkout_service = Arc::new(CheckoutService::new(cart_repo.clone(), order_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            category_repo,
            product_repo,
            cart_repo,
            order_repo,
            auth_service,
            cart_service,
            checkout_service,
            asset_store,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
