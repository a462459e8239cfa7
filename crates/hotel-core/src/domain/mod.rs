//! # Hotel Core - Domain Module
//!
//! Domain entities for tenant routing and login.

pub mod tenant;
pub mod master_user;
pub mod claims;

pub use tenant::{Tenant, TenantSummary};
pub use master_user::MasterUser;
pub use claims::RequestClaims;
