//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;
pub mod tenant_connector;

pub use connection::{create_pool, run_migrations};
pub use postgres::{PgMasterUserRepository, PgTenantDirectory};
pub use tenant_connector::{PgTenantConnector, PgTenantHandle};
