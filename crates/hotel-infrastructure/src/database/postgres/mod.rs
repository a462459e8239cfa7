//! PostgreSQL repository implementations

pub mod tenant_directory_impl;
pub mod user_repo_impl;

pub use tenant_directory_impl::PgTenantDirectory;
pub use user_repo_impl::PgMasterUserRepository;
