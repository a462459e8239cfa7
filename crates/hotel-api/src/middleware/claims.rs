// ============================================================================
// Hotel API - Claims Middleware
// File: crates/hotel-api/src/middleware/claims.rs
// ============================================================================
//! Reads the bearer token and the `X-Hotel-Code` header into a fresh
//! per-request [`RequestContext`].

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::RequestId;
use tracing::debug;

use hotel_core::domain::RequestClaims;
use hotel_core::services::ResolutionContext;
use hotel_security::bearer::extract_bearer;
use hotel_shared::constants::HOTEL_CODE_HEADER;

use crate::state::AppState;

const PUBLIC_PREFIXES: &[&str] = &[
    "/swagger",
    "/health",
    "/_framework",
    "/css",
    "/js",
    "/api/auth/login",
];

const STATIC_EXTENSIONS: &[&str] = &[
    ".html", ".css", ".js", ".map", ".ico", ".woff", ".woff2", // web assets
    ".zip", ".rar", ".7z", ".tar", ".gz", // archives
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", // documents
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", // images
    ".mp4", ".avi", ".mov", ".wmv", ".flv", // video
    ".mp3", ".wav", ".ogg", ".aac", // audio
    ".txt", ".csv", ".json", ".xml", // data
    ".exe", ".msi", ".dmg", ".deb", ".rpm", // installers
];

/// Request-scoped data shared by every extractor of one request.
#[derive(Clone)]
pub struct RequestContext {
    /// Value of the `x-request-id` header, echoed on the response.
    pub request_id: String,
    pub resolution: Arc<ResolutionContext>,
}

impl RequestContext {
    pub fn claims(&self) -> &RequestClaims {
        self.resolution.claims()
    }
}

/// Paths served without looking at the bearer token.
pub fn is_public_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower == "/"
        || PUBLIC_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
        || STATIC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub async fn resolve_claims(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let headers = request.headers();

    let claims = if is_public_path(&path) {
        RequestClaims::default()
    } else {
        claims_from_headers(&state, headers)
    };
    let hotel_code = headers
        .get(HOTEL_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!(
        %request_id,
        path = %path,
        user_id = claims.user_label(),
        anonymous = claims.is_anonymous(),
        has_tenant_claim = claims.tenant_id.is_some(),
        has_hotel_code = hotel_code.is_some(),
        "Request claims extracted"
    );

    let resolution = Arc::new(ResolutionContext::new(claims, hotel_code));
    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        resolution: resolution.clone(),
    });

    let response = next.run(request).await;

    match resolution.resolution() {
        Some(Ok(tenant)) => debug!(
            %request_id,
            tenant_code = %tenant.code,
            status = %response.status(),
            "Request served for tenant"
        ),
        Some(Err(e)) => debug!(
            %request_id,
            status = %response.status(),
            "Request ended without a tenant: {}", e
        ),
        None => {}
    }

    response
}

fn claims_from_headers(state: &AppState, headers: &HeaderMap) -> RequestClaims {
    let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
    else {
        return RequestClaims::default();
    };

    match state.jwt.validate_token(token) {
        Some(claims) => RequestClaims::new(
            Some(&claims.user_id),
            Some(&claims.tenant_id),
            Some(&claims.username),
            claims.roles.as_deref(),
        ),
        None => RequestClaims::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/health/ready"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/index.HTML"));
        assert!(is_public_path("/js/app.js"));
        assert!(is_public_path("/swagger/index"));
        assert!(is_public_path("/_framework/blazor.web"));
        assert!(is_public_path("/css/site"));
        assert!(is_public_path("/uploads/invoice.PDF"));
        assert!(is_public_path("/exports/guests.csv"));
        assert!(is_public_path("/backups/2026.zip"));
        assert!(is_public_path("/api/settings.json"));
        assert!(!is_public_path("/api/tenant/hotels"));
        assert!(!is_public_path("/api/auth/validate"));
    }
}
