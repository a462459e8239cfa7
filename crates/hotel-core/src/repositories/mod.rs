//! Repository traits (ports)

pub mod tenant_directory;
pub mod user_repository;

pub use tenant_directory::TenantDirectory;
pub use user_repository::MasterUserRepository;

#[cfg(test)]
pub use tenant_directory::MockTenantDirectory;
#[cfg(test)]
pub use user_repository::MockMasterUserRepository;
