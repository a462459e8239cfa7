//! Per-tenant connection descriptors.
//!
//! Every tenant lives on the same database server and shares one set of
//! credentials; only the database name varies.

use std::fmt;

use hotel_shared::config::TenantDatabaseSettings;
use hotel_shared::constants::DEFAULT_TENANT_DB_PORT;
use hotel_shared::utils::non_blank;
use tracing::{debug, error};

use crate::domain::Tenant;
use crate::error::TenantError;

/// Connection parameters for one tenant database.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub tenant_code: String,
    pub server: String,
    pub port: u16,
    pub database: String,
    pub user_id: String,
    pub password: String,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
    pub multiple_active_result_sets: bool,
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Server={},{}; Database={}; User Id={}; Password=****; Encrypt={}; \
             TrustServerCertificate={}; MultipleActiveResultSets={};",
            self.server,
            self.port,
            self.database,
            self.user_id,
            self.encrypt,
            self.trust_server_certificate,
            self.multiple_active_result_sets,
        )
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("tenant_code", &self.tenant_code)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user_id", &self.user_id)
            .field("password", &"****")
            .finish()
    }
}

/// Builds [`ConnectionDescriptor`]s from the shared server settings.
#[derive(Debug, Clone)]
pub struct ConnectionStringBuilder {
    settings: TenantDatabaseSettings,
}

impl ConnectionStringBuilder {
    pub fn new(settings: TenantDatabaseSettings) -> Self {
        Self { settings }
    }

    /// Fails with `TenantMisconfigured` for an unprovisioned tenant and with
    /// `Configuration` when any shared server setting is missing.
    pub fn build(&self, tenant: &Tenant) -> Result<ConnectionDescriptor, TenantError> {
        if !tenant.is_provisioned() {
            error!(
                tenant_code = %tenant.code,
                tenant_id = tenant.id,
                "Database name is empty for tenant"
            );
            return Err(TenantError::TenantMisconfigured(tenant.code.clone()));
        }

        let server = required(self.settings.server.as_deref(), "tenant_database.server")?;
        let user_id = required(self.settings.user_id.as_deref(), "tenant_database.user_id")?;
        let password = required(self.settings.password.as_deref(), "tenant_database.password")?;

        let (host, port) = split_server(&server, self.settings.port);

        debug!(
            tenant_code = %tenant.code,
            database = %tenant.database_name,
            server = %host,
            "Built connection descriptor for tenant"
        );

        Ok(ConnectionDescriptor {
            tenant_code: tenant.code.clone(),
            server: host,
            port,
            database: tenant.database_name.trim().to_string(),
            user_id,
            password,
            encrypt: true,
            trust_server_certificate: true,
            multiple_active_result_sets: true,
        })
    }
}

fn required(value: Option<&str>, key: &'static str) -> Result<String, TenantError> {
    non_blank(value).ok_or_else(|| {
        error!("{} is missing from configuration", key);
        TenantError::Configuration(key)
    })
}

/// Accepts `host`, `host:port`, or `host,port`. An explicit port in the
/// server string wins over the separate port setting.
fn split_server(server: &str, configured_port: Option<u16>) -> (String, u16) {
    let fallback = configured_port.unwrap_or(DEFAULT_TENANT_DB_PORT);
    let split = server.rsplit_once(',').or_else(|| server.rsplit_once(':'));
    match split {
        Some((host, port)) => match port.trim().parse::<u16>() {
            Ok(port) if !host.trim().is_empty() => (host.trim().to_string(), port),
            _ => (server.to_string(), fallback),
        },
        None => (server.to_string(), fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TenantDatabaseSettings {
        TenantDatabaseSettings {
            server: Some(" db.internal ".to_string()),
            port: None,
            user_id: Some("hotel_app".to_string()),
            password: Some("p@ss word".to_string()),
        }
    }

    fn tenant(database_name: &str) -> Tenant {
        Tenant {
            id: 7,
            code: "HTL7".to_string(),
            name: "Hotel Seven".to_string(),
            database_name: database_name.to_string(),
            base_url: None,
            enable_queue_mode: false,
            enable_queue_worker: false,
            queue_worker_interval_seconds: None,
            queue_worker_batch_size: None,
            use_queue_middleware: false,
            default_partner: None,
        }
    }

    #[test]
    fn test_descriptor_varies_only_by_database() {
        let builder = ConnectionStringBuilder::new(settings());
        let a = builder.build(&tenant("Hotel7Db")).unwrap();
        let b = builder.build(&tenant("Hotel9Db")).unwrap();

        assert_eq!(a.server, "db.internal");
        assert_eq!(a.port, DEFAULT_TENANT_DB_PORT);
        assert_eq!(a.database, "Hotel7Db");
        assert_eq!(b.database, "Hotel9Db");
        assert_eq!((a.user_id.as_str(), a.password.as_str()), (b.user_id.as_str(), b.password.as_str()));
        assert!(a.encrypt && a.multiple_active_result_sets);
    }

    #[test]
    fn test_display_and_debug_hide_password() {
        let descriptor = ConnectionStringBuilder::new(settings())
            .build(&tenant("Hotel7Db"))
            .unwrap();
        let rendered = descriptor.to_string();
        assert!(rendered.contains("Database=Hotel7Db;"));
        assert!(rendered.contains("Encrypt=true;"));
        assert!(!rendered.contains("p@ss"));
        assert!(!format!("{:?}", descriptor).contains("p@ss"));
    }

    #[test]
    fn test_missing_settings_are_configuration_errors() {
        let mut s = settings();
        s.password = Some("   ".to_string());
        let err = ConnectionStringBuilder::new(s).build(&tenant("Hotel7Db")).unwrap_err();
        assert_eq!(err, TenantError::Configuration("tenant_database.password"));

        let mut s = settings();
        s.server = None;
        let err = ConnectionStringBuilder::new(s).build(&tenant("Hotel7Db")).unwrap_err();
        assert_eq!(err, TenantError::Configuration("tenant_database.server"));

        let mut s = settings();
        s.user_id = None;
        let err = ConnectionStringBuilder::new(s).build(&tenant("Hotel7Db")).unwrap_err();
        assert_eq!(err, TenantError::Configuration("tenant_database.user_id"));
    }

    #[test]
    fn test_unprovisioned_tenant_rejected() {
        let err = ConnectionStringBuilder::new(settings()).build(&tenant(" ")).unwrap_err();
        assert_eq!(err, TenantError::TenantMisconfigured("HTL7".to_string()));
    }

    #[test]
    fn test_server_port_forms() {
        assert_eq!(split_server("db,1433", None), ("db".to_string(), 1433));
        assert_eq!(split_server("db:6432", Some(5432)), ("db".to_string(), 6432));
        assert_eq!(split_server("db", Some(6543)), ("db".to_string(), 6543));
        assert_eq!(split_server("db:notaport", None), ("db:notaport".to_string(), DEFAULT_TENANT_DB_PORT));
    }
}
