// ============================================================================
// Hotel API - Auth Handlers
// File: crates/hotel-api/src/handlers/auth.rs
// ============================================================================
//! Login and token validation

use axum::{extract::State, http::header::AUTHORIZATION, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use hotel_core::services::{LoginResult, UserInfo};
use hotel_security::bearer::extract_bearer;
use hotel_shared::utils::split_roles;

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
    pub tenant_code: Option<String>,
    pub tenant_name: Option<String>,
    pub roles: Vec<String>,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            token: result.token,
            expires_at: result.expires_at,
            user: result.user,
            tenant_code: result.tenant_code,
            tenant_name: result.tenant_name,
            roles: result.roles,
        }
    }
}

/// Decoded claims echoed back by the validate endpoint
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub valid: bool,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    pub username: String,
    pub roles: Vec<String>,
}

/// Login handler - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let result = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(
        ApiResponse::success(LoginResponse::from(result)).with_request_id(&ctx.request_id),
    ))
}

/// Token validation handler - POST /api/auth/validate
pub async fn validate_token(
    State(state): State<AppState>,
    ctx: RequestContext,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenInfo>>, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let claims = state
        .jwt
        .validate_token(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let info = TokenInfo {
        valid: true,
        roles: claims.roles.as_deref().map(split_roles).unwrap_or_default(),
        user_id: claims.user_id,
        tenant_id: claims.tenant_id,
        username: claims.username,
    };
    Ok(Json(ApiResponse::success(info).with_request_id(&ctx.request_id)))
}
