//! Bearer-token verification against the external identity provider.
//!
//! Tokens are opaque to this service: they are forwarded to the provider's
//! tokeninfo endpoint and the returned subject/email pair is trusted.
//! Verified identities are cached briefly to keep auth off the hot path.

use crate::error::{AppError, Result};
use crate::services::Cache;
use axum::http::HeaderMap;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// How long a verified token stays cached.
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(300);

/// Fallback email when the provider omits one.
const UNKNOWN_EMAIL: &str = "unknown@email.com";

/// Verified identity extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Tokeninfo response. Providers differ on the subject field name.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: Option<String>,
    user_id: Option<String>,
    email: Option<String>,
}

/// Identity-provider client with a verification cache.
pub struct AuthService {
    client: Client,
    tokeninfo_url: String,
    cache: Cache<AuthUser>,
}

impl AuthService {
    pub fn new(tokeninfo_url: String) -> Self {
        Self {
            client: Client::new(),
            tokeninfo_url,
            cache: Cache::new(TOKEN_CACHE_TTL),
        }
    }

    /// Extract and verify the bearer token from request headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser> {
        let token = bearer_token(headers)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        self.verify(token).await
    }

    /// Verify a raw token against the identity provider.
    pub async fn verify(&self, token: &str) -> Result<AuthUser> {
        if let Some(user) = self.cache.get(token) {
            return Ok(user);
        }

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Token verification failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Malformed tokeninfo response: {}", e)))?;

        let id = info
            .sub
            .or(info.user_id)
            .ok_or_else(|| AppError::Unauthorized("Token has no subject".to_string()))?;

        let user = AuthUser {
            id,
            email: info.email.unwrap_or_else(|| UNKNOWN_EMAIL.to_string()),
        };

        debug!("Verified token for {}", user.id);
        self.cache.set(token.to_string(), user.clone());
        Ok(user)
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
