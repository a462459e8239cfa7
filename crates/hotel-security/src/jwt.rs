//! JWT token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use hotel_shared::config::JwtSettings;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

/// Claims carried by every issued token. Ids are strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    pub username: String,
    /// Comma-separated role codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expiration: Duration,
}

impl JwtService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            expiration: Duration::minutes(settings.expiration_minutes),
        }
    }

    /// Issues a token bound to one tenant. A non-positive tenant id is refused.
    pub fn generate_token(
        &self,
        user_id: i32,
        username: &str,
        tenant_id: i32,
        roles: &[String],
    ) -> Result<IssuedToken, JwtError> {
        if tenant_id <= 0 {
            return Err(JwtError::CreationError(format!(
                "invalid tenant id {} for user {}",
                tenant_id, user_id
            )));
        }

        let now = Utc::now();
        let expires_at = now + self.expiration;
        let roles = roles
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            username: username.to_string(),
            roles: if roles.is_empty() { None } else { Some(roles) },
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, expiry, issuer and audience.
    pub fn decode_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }

    /// Like [`decode_token`](Self::decode_token) but logs and swallows failures.
    pub fn validate_token(&self, token: &str) -> Option<Claims> {
        match self.decode_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!("Bearer token rejected: {}", e);
                None
            }
        }
    }
}
