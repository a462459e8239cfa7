//! # Hotel Infrastructure
//!
//! PostgreSQL adapters: master pool, tenant directory, master users, and
//! per-tenant database connections.

pub mod database;

pub use database::{
    create_pool, run_migrations, PgMasterUserRepository, PgTenantConnector, PgTenantDirectory,
    PgTenantHandle,
};
