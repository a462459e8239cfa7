//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not active")]
    UserNotActive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User {username} has no valid tenant assignment (tenant id {tenant_id})")]
    InvalidTenantAssignment { username: String, tenant_id: i32 },

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Outcome of a failed tenant resolution or tenant database access. Cloneable
/// because the resolution outcome is memoized per request and handed out to
/// every caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    #[error("Missing tenant information. Provide a valid bearer token or X-Hotel-Code header")]
    MissingTenantInfo,

    #[error("Hotel code mismatch. You are authorized for hotel '{authorized}' only")]
    TenantCodeMismatch { authorized: String, requested: String },

    #[error("Tenant not found for code: {0}")]
    TenantNotFound(String),

    #[error("Database name is not configured for tenant: {0}")]
    TenantMisconfigured(String),

    #[error("Tenant directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Tenant database setting {0} is not configured")]
    Configuration(&'static str),

    #[error("Failed to connect to tenant database {database}: {reason}")]
    TenantConnectionFailed { database: String, reason: String },
}

impl TenantError {
    /// Header/token disagreement: a spoofing attempt, not a usability issue.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, TenantError::TenantCodeMismatch { .. })
    }

    /// Infrastructure faults; the whole request may be retried later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TenantError::DirectoryUnavailable(_) | TenantError::TenantConnectionFailed { .. }
        )
    }
}
