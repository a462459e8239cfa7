// ============================================================================
// Hotel API - Tenant Handlers
// File: crates/hotel-api/src/handlers/tenants.rs
// ============================================================================
//! Hotel listing and current-tenant diagnostics

use axum::{
    extract::{Path, State},
    Json,
};

use hotel_core::domain::TenantSummary;
use hotel_core::services::ConnectionCheck;

use crate::error::ApiError;
use crate::extractors::{AuthUser, CurrentTenant};
use crate::middleware::RequestContext;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/tenant/hotels
pub async fn list_hotels(
    State(state): State<AppState>,
    ctx: RequestContext,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<TenantSummary>>>, ApiError> {
    let hotels = state.tenants.hotels_for(user.user_id, &user.claims).await?;
    Ok(Json(ApiResponse::success(hotels).with_request_id(&ctx.request_id)))
}

/// GET /api/tenant/hotels/{code}
pub async fn get_hotel_by_code(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<TenantSummary>>, ApiError> {
    let hotel = state
        .tenants
        .hotel_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Hotel not found with code: {}", code)))?;
    Ok(Json(ApiResponse::success(hotel).with_request_id(&ctx.request_id)))
}

/// GET /api/tenant/current
pub async fn current_tenant(
    ctx: RequestContext,
    CurrentTenant(tenant): CurrentTenant,
) -> Json<ApiResponse<TenantSummary>> {
    Json(ApiResponse::success(tenant.summary()).with_request_id(&ctx.request_id))
}

/// GET /api/tenant/current/connection
pub async fn current_connection(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<ApiResponse<ConnectionCheck>>, ApiError> {
    let check = state.databases.verify(&ctx.resolution).await?;
    Ok(Json(ApiResponse::success(check).with_request_id(&ctx.request_id)))
}
