// ============================================================================
// Hotel Core - Tenant Entity
// File: crates/hotel-core/src/domain/tenant.rs
// Description: One hotel installation and its routing metadata
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A hotel installation, as recorded in the central tenant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Tenant {
    pub id: i32,

    #[validate(length(min = 1, max = 50, message = "Tenant code must be between 1 and 50 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 200, message = "Tenant name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Database name too long"))]
    pub database_name: String,

    #[validate(length(max = 200, message = "Base URL too long"))]
    pub base_url: Option<String>,

    // Queue forwarding flags (read-only here)
    pub enable_queue_mode: bool,
    pub enable_queue_worker: bool,
    pub queue_worker_interval_seconds: Option<i32>,
    pub queue_worker_batch_size: Option<i32>,
    pub use_queue_middleware: bool,
    pub default_partner: Option<String>,
}

impl Tenant {
    /// Codes compare case-insensitively everywhere (lookup and mismatch checks).
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// A tenant without a database name exists but is not provisioned.
    pub fn is_provisioned(&self) -> bool {
        !self.database_name.trim().is_empty()
    }

    pub fn summary(&self) -> TenantSummary {
        TenantSummary::from(self)
    }
}

/// Public projection returned by the hotel listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub base_url: Option<String>,
}

impl From<&Tenant> for TenantSummary {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id,
            code: tenant.code.clone(),
            name: tenant.name.clone(),
            base_url: tenant.base_url.clone(),
        }
    }
}
