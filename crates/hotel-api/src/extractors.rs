//! Request extractors for the per-request tenant context

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use hotel_core::domain::{RequestClaims, Tenant};

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::state::AppState;

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| ApiError::InternalError("Request context not initialized".to_string()))
    }
}

/// The tenant resolved for this request.
pub struct CurrentTenant(pub Arc<Tenant>);

impl FromRequestParts<AppState> for CurrentTenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        let tenant = state.resolver().resolve(&ctx.resolution).await?;
        Ok(CurrentTenant(tenant))
    }
}

/// A caller with a valid token carrying a numeric `userId`.
pub struct AuthUser {
    pub user_id: i32,
    pub claims: RequestClaims,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        let claims = ctx.claims().clone();
        let user_id = claims.user_id_number().ok_or_else(|| {
            ApiError::Unauthorized("User information not found in token".to_string())
        })?;
        Ok(AuthUser { user_id, claims })
    }
}
