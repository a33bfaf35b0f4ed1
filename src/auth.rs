use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::models::user::{NewUserProfile, UserProfile};
use crate::store::{ContentStore, Query, StoreError, Table, from_rows, to_row};

pub const MSG_LOGIN_FAILED: &str = "Username atau password salah";
pub const COOKIE_NAME: &str = "access_token";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token tidak ditemukan")]
    MissingToken,
    #[error("token tidak valid: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("gagal menyiapkan profil pengguna: {0}")]
    Provisioning(#[from] StoreError),
}

/// Checks admin credentials. `false` covers every kind of failure; callers
/// show [`MSG_LOGIN_FAILED`] and nothing more.
pub trait Authenticator: Send + Sync {
    fn login(&self, username: &str, password: &str) -> bool;
}

/// Single admin account taken from configuration, password stored as a
/// bcrypt hash.
pub struct ConfigAuthenticator {
    username: String,
    password_hash: Option<String>,
}

impl ConfigAuthenticator {
    pub fn new(username: &str, password_hash: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            password_hash: password_hash.map(str::to_string),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.admin_username, config.admin_password_hash.as_deref())
    }
}

impl Authenticator for ConfigAuthenticator {
    fn login(&self, username: &str, password: &str) -> bool {
        let Some(hash) = &self.password_hash else {
            log::warn!("ADMIN_PASSWORD_HASH tidak diset, login ditolak");
            return false;
        };
        if username.trim() != self.username {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            log::error!("bcrypt verify: {:?}", e);
            false
        })
    }
}

pub fn generate_jwt(
    profile: &UserProfile,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: profile.username.clone(),
        user_id: profile.id.clone(),
        role: profile.role.clone(),
        exp: (now + chrono::Duration::days(2)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(token_data.claims)
}

pub fn verify_jwt(req: &HttpRequest, secret: &str) -> Result<Claims, AuthError> {
    let cookie = req.cookie(COOKIE_NAME).ok_or_else(|| {
        log::debug!("No access_token cookie found in request to {}", req.path());
        AuthError::MissingToken
    })?;

    decode_jwt(cookie.value(), secret).map_err(|e| {
        log::error!("JWT verification failed for {}: {}", req.path(), e);
        e
    })
}

/// The signed-in user, if the request carries a valid session.
pub fn current_user(req: &HttpRequest, secret: &str) -> Option<Claims> {
    verify_jwt(req, secret).ok()
}

/// The stored profile for `user_id`, if one exists.
pub async fn find_profile(
    store: &dyn ContentStore,
    user_id: &str,
) -> Result<Option<UserProfile>, StoreError> {
    let query = Query::all().eq("id", user_id);
    let existing: Vec<UserProfile> = from_rows(store.select(Table::Users, &query).await?)?;
    Ok(existing.into_iter().next())
}

/// Returns the user's profile row, creating it with `default_role` on first
/// login. A failed insert is an error; access is not granted without a
/// stored profile.
pub async fn ensure_profile(
    store: &dyn ContentStore,
    user_id: &str,
    username: &str,
    default_role: &str,
) -> Result<UserProfile, AuthError> {
    if let Some(profile) = find_profile(store, user_id).await? {
        return Ok(profile);
    }

    let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let new_profile = NewUserProfile {
        id: user_id,
        username,
        role: default_role,
        created_at: created_at.clone(),
    };
    store.insert(Table::Users, to_row(&new_profile)?).await?;
    log::info!("Profil baru untuk {} dibuat dengan role {}", username, default_role);

    Ok(UserProfile {
        id: user_id.to_string(),
        username: username.to_string(),
        role: default_role.to_string(),
        created_at: Some(created_at),
    })
}
