// ============================================================================
// Hotel Core - Tenant Resolver
// File: crates/hotel-core/src/services/tenant_resolver.rs
// ============================================================================
//! Maps one request to exactly one tenant.
//!
//! Resolution order: the token's `tenantId` claim, then the `X-Hotel-Code`
//! header. When both are present they must name the same tenant. The outcome,
//! success or failure, is memoized in the request's [`ResolutionContext`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::domain::{RequestClaims, Tenant};
use crate::error::{DomainError, TenantError};
use crate::repositories::TenantDirectory;
use crate::services::tenant_database::TenantHandle;

pub type Resolution = Result<Arc<Tenant>, TenantError>;

/// Per-request state: claims, the raw hotel code header, and the memoized
/// tenant and database handle. Created once per request and dropped with it.
#[derive(Default)]
pub struct ResolutionContext {
    claims: RequestClaims,
    hotel_code: Option<String>,
    pub(crate) resolved: OnceCell<Resolution>,
    pub(crate) handle: OnceCell<Arc<dyn TenantHandle>>,
}

impl ResolutionContext {
    pub fn new(claims: RequestClaims, hotel_code: Option<String>) -> Self {
        Self {
            claims,
            hotel_code: hotel_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            resolved: OnceCell::new(),
            handle: OnceCell::new(),
        }
    }

    pub fn claims(&self) -> &RequestClaims {
        &self.claims
    }

    pub fn hotel_code(&self) -> Option<&str> {
        self.hotel_code.as_deref()
    }

    /// The memoized outcome, if resolution already completed.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolved.get()
    }
}

pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    lookup_timeout: Duration,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, lookup_timeout: Duration) -> Self {
        Self {
            directory,
            lookup_timeout,
        }
    }

    /// Resolves the tenant for this request. Later calls with the same context
    /// return the memoized outcome without querying the directory again. If
    /// the returned future is dropped before completion nothing is memoized.
    pub async fn resolve(&self, ctx: &ResolutionContext) -> Resolution {
        ctx.resolved
            .get_or_init(|| self.resolve_uncached(ctx))
            .await
            .clone()
    }

    async fn resolve_uncached(&self, ctx: &ResolutionContext) -> Resolution {
        let claims = ctx.claims();

        let tenant_from_token = match claims.tenant_id_number() {
            Some(tenant_id) => {
                let found = self
                    .lookup("id", self.directory.find_by_id(tenant_id))
                    .await?;
                if found.is_none() {
                    // Falls through to the header path on purpose.
                    warn!(
                        tenant_id,
                        user_id = claims.user_label(),
                        "Tenant not found for tenantId from token"
                    );
                }
                found
            }
            None => {
                if let Some(raw) = claims.tenant_id.as_deref() {
                    warn!(tenant_id = raw, "Ignoring tenantId claim that is not a positive integer");
                }
                None
            }
        };

        let tenant = match (tenant_from_token, ctx.hotel_code()) {
            (Some(tenant), Some(hotel_code)) => {
                if !tenant.matches_code(hotel_code) {
                    warn!(
                        security = true,
                        hotel_code,
                        tenant_code = %tenant.code,
                        user_id = claims.user_label(),
                        "SECURITY: X-Hotel-Code header does not match tenant from token"
                    );
                    return Err(TenantError::TenantCodeMismatch {
                        authorized: tenant.code,
                        requested: hotel_code.to_string(),
                    });
                }
                info!(
                    tenant_code = %tenant.code,
                    tenant_name = %tenant.name,
                    database = %tenant.database_name,
                    "Tenant resolved from token (confirmed by X-Hotel-Code)"
                );
                tenant
            }
            (Some(tenant), None) => {
                info!(
                    tenant_code = %tenant.code,
                    tenant_name = %tenant.name,
                    database = %tenant.database_name,
                    "Tenant resolved from token"
                );
                tenant
            }
            (None, Some(hotel_code)) => {
                match self
                    .lookup("code", self.directory.find_by_code(hotel_code))
                    .await?
                {
                    Some(tenant) => {
                        info!(
                            tenant_code = %tenant.code,
                            tenant_name = %tenant.name,
                            database = %tenant.database_name,
                            "Tenant resolved from X-Hotel-Code header"
                        );
                        tenant
                    }
                    None => {
                        warn!(
                            hotel_code,
                            user_id = claims.user_label(),
                            "Tenant not found for hotel code"
                        );
                        return Err(TenantError::TenantNotFound(hotel_code.to_string()));
                    }
                }
            }
            (None, None) => {
                warn!(
                    user_id = claims.user_label(),
                    "Missing tenant information: no tenant claim and no X-Hotel-Code header"
                );
                return Err(TenantError::MissingTenantInfo);
            }
        };

        if !tenant.is_provisioned() {
            error!(
                tenant_code = %tenant.code,
                tenant_id = tenant.id,
                "Database name is not set for tenant"
            );
            return Err(TenantError::TenantMisconfigured(tenant.code));
        }

        Ok(Arc::new(tenant))
    }

    async fn lookup<F>(&self, by: &'static str, query: F) -> Result<Option<Tenant>, TenantError>
    where
        F: Future<Output = Result<Option<Tenant>, DomainError>>,
    {
        match tokio::time::timeout(self.lookup_timeout, query).await {
            Ok(Ok(tenant)) => Ok(tenant),
            Ok(Err(e)) => {
                error!(lookup = by, "Tenant directory error while resolving tenant: {}", e);
                Err(TenantError::DirectoryUnavailable(e.to_string()))
            }
            Err(_) => {
                error!(
                    lookup = by,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Tenant directory lookup timed out"
                );
                Err(TenantError::DirectoryUnavailable(format!(
                    "lookup by {} timed out after {:?}",
                    by, self.lookup_timeout
                )))
            }
        }
    }
}
