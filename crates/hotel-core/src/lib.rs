//! # Hotel Core
//!
//! Domain entities, repository ports, and the tenant routing services: the
//! per-request tenant resolver, the connection descriptor builder, and the
//! per-request tenant database provider.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, TenantError};
