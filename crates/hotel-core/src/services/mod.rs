//! Domain services (tenant routing and login)

pub mod auth_service;
pub mod connection_builder;
pub mod tenant_database;
pub mod tenant_resolver;
pub mod tenant_service;

pub use auth_service::{AuthService, LoginResult, UserInfo};
pub use connection_builder::{ConnectionDescriptor, ConnectionStringBuilder};
pub use tenant_database::{ConnectionCheck, TenantConnector, TenantDatabaseProvider, TenantHandle};
pub use tenant_resolver::{Resolution, ResolutionContext, TenantResolver};
pub use tenant_service::TenantService;
