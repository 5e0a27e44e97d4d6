use std::sync::Arc;
use crate::domain::{
    models::{auth::{Claims, TokenPair}, cart::Cart, user::User},
    ports::{CartRepository, UserRepository},
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{password_hash::{PasswordHash, PasswordHasher, SaltString}, Argon2, PasswordVerifier};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use chrono::{Duration, Utc};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
    config: Config,
    encoding_key: EncodingKey,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, carts: Arc<dyn CartRepository>, config: Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

        Self { users, carts, config, encoding_key }
    }

    /// Creates the user, then its empty cart. The cart row carries the user's
    /// foreign key, so the user must be persisted first.
    pub async fn register(
        &self,
        username: String,
        email: Option<String>,
        password: String,
    ) -> Result<User, AppError> {
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)?
            .to_string();

        let user = self.users.create(&User::new(username, email, password_hash)).await?;
        self.carts.create(&Cart::new(user.id.clone())).await?;

        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        // Absent user and wrong password fail identically.
        let user = self.users.find_by_username(username).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        self.issue_token_pair(&user).await
    }

    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<TokenPair, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let user = self.users.find_by_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        match user.refresh_token_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(AppError::Unauthorized),
        }

        // Issuing a new pair overwrites the stored hash, so the presented
        // token is spent even if the caller never uses the new one.
        self.issue_token_pair(&user).await
    }

    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let now = Utc::now();

        let claims = Claims {
            iss: self.config.jwt_issuer.clone(),
            sub: user.id.clone(),
            aud: self.config.jwt_audience.clone(),
            exp: (now + Duration::days(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            username: user.username.clone(),
            role: user.role,
        };

        let access_token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let mut entropy = [0u8; 32];
        OsRng.fill_bytes(&mut entropy);
        let refresh_token = BASE64.encode(entropy);

        self.users
            .store_refresh_token(&user.id, &self.hash_token(&refresh_token), now + Duration::days(7))
            .await?;

        Ok(TokenPair { access_token, refresh_token })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
