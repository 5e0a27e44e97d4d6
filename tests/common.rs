use commerce_backend::{
    api::router::create_router,
    config::Config,
    domain::services::{
        auth_service::AuthService, cart_service::CartService, checkout_service::CheckoutService,
    },
    infra::assets::fs_asset_store::FsAssetStore,
    infra::repositories::{
        sqlite_cart_repo::SqliteCartRepo, sqlite_category_repo::SqliteCategoryRepo,
        sqlite_order_repo::SqliteOrderRepo, sqlite_product_repo::SqliteProductRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub asset_root: PathBuf,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let asset_root = std::env::temp_dir().join(format!("test_assets_{}", Uuid::new_v4()));

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-secret-key-0123456789abcdef0123456789abcdef".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-frontend".to_string(),
            asset_root: asset_root.to_string_lossy().to_string(),
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let category_repo = Arc::new(SqliteCategoryRepo::new(pool.clone()));
        let product_repo = Arc::new(SqliteProductRepo::new(pool.clone()));
        let cart_repo = Arc::new(SqliteCartRepo::new(pool.clone()));
        let order_repo = Arc::new(SqliteOrderRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            cart_repo.clone(),
            config.clone(),
        ));
        let cart_service = Arc::new(CartService::new(cart_repo.clone(), product_repo.clone()));
        let checkout_service = Arc::new(CheckoutService::new(cart_repo.clone(), order_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo,
            category_repo,
            product_repo,
            cart_repo,
            order_repo,
            auth_service,
            cart_service,
            checkout_service,
            asset_store: Arc::new(FsAssetStore::new(&asset_root)),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            asset_root,
            state,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"username": username, "password": password}).to_string()))
                .unwrap(),
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Register failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthTokens {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"username": username, "password": password}).to_string()))
                .unwrap(),
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        AuthTokens {
            access_token: body["accessToken"].as_str().expect("No accessToken in body").to_string(),
            refresh_token: body["refreshToken"].as_str().expect("No refreshToken in body").to_string(),
        }
    }

    pub async fn make_admin(&self, username: &str) {
        sqlx::query("UPDATE users SET role = 'Admin' WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .expect("Failed to promote user to Admin");
    }

    /// Registers and logs in an admin user for catalog and order management.
    pub async fn admin_tokens(&self) -> AuthTokens {
        self.register("admin", "admin-password").await;
        self.make_admin("admin").await;
        self.login("admin", "admin-password").await
    }

    pub async fn create_category(&self, tokens: &AuthTokens, name: &str) -> Value {
        let (content_type, body) = multipart_form(&[("name", name)], None);

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/categories")
                .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Create category failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }

    pub async fn create_product(
        &self,
        tokens: &AuthTokens,
        name: &str,
        price: &str,
        stock_quantity: i32,
        category_id: Option<&str>,
    ) -> Value {
        let stock = stock_quantity.to_string();
        let mut fields = vec![
            ("name", name),
            ("description", "A test product"),
            ("price", price),
            ("stock_quantity", stock.as_str()),
        ];
        if let Some(category_id) = category_id {
            fields.push(("category_id", category_id));
        }
        let (content_type, body) = multipart_form(&fields, None);

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Create product failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }

    pub async fn add_to_cart(&self, user_id: &str, product_id: &str, quantity: i32) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/cart/{user_id}/add"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"product_id": product_id, "quantity": quantity}).to_string()))
                .unwrap(),
        ).await.unwrap()
    }

    pub async fn get_cart(&self, user_id: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/cart/{user_id}"))
                .body(Body::empty())
                .unwrap(),
        ).await.unwrap()
    }

    pub async fn get_product(&self, product_id: &str) -> Value {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Get product failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_dir_all(&self.asset_root);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Builds a multipart/form-data body by hand; returns (content type, body).
pub fn multipart_form(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = MULTIPART_BOUNDARY;
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
