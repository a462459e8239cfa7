//! Tenant directory trait (port)

use async_trait::async_trait;
use crate::domain::Tenant;
use crate::error::DomainError;

/// Read-only view of the central tenant table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Tenant>, DomainError>;

    /// Case-insensitive exact match on the tenant code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>, DomainError>;

    /// Every tenant, ordered by id.
    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError>;

    /// Tenants assigned to `user_id` through user/tenant assignments, ordered by id.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Tenant>, DomainError>;
}
