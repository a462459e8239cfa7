//! Per-tenant PostgreSQL connections.
//!
//! One dedicated connection per request, closed when the last handle drops.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, PgConnection};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use hotel_core::error::TenantError;
use hotel_core::services::{ConnectionDescriptor, TenantConnector, TenantHandle};

pub struct PgTenantConnector {
    connect_timeout: Duration,
}

impl PgTenantConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Maps the engine-neutral descriptor onto Postgres options. `encrypt` turns
/// on TLS; multiple active result sets have no Postgres counterpart.
pub(crate) fn connect_options(descriptor: &ConnectionDescriptor) -> PgConnectOptions {
    let ssl_mode = match (descriptor.encrypt, descriptor.trust_server_certificate) {
        (false, _) => PgSslMode::Prefer,
        (true, true) => PgSslMode::Require,
        (true, false) => PgSslMode::VerifyFull,
    };

    PgConnectOptions::new()
        .host(&descriptor.server)
        .port(descriptor.port)
        .database(&descriptor.database)
        .username(&descriptor.user_id)
        .password(&descriptor.password)
        .ssl_mode(ssl_mode)
        .application_name("hotel-server")
}

#[async_trait]
impl TenantConnector for PgTenantConnector {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn TenantHandle>, TenantError> {
        let failed = |reason: String| TenantError::TenantConnectionFailed {
            database: descriptor.database.clone(),
            reason,
        };

        debug!(target: "hotel_infrastructure::tenant", "Connecting: {}", descriptor);

        let conn = tokio::time::timeout(self.connect_timeout, connect_options(descriptor).connect())
            .await
            .map_err(|_| failed(format!("connect timed out after {:?}", self.connect_timeout)))?
            .map_err(|e| failed(e.to_string()))?;

        Ok(Arc::new(PgTenantHandle {
            database_name: descriptor.database.clone(),
            conn: Mutex::new(conn),
        }))
    }
}

/// One request's tenant session. Reach it from a request with
/// `TenantDatabaseProvider::database_as::<PgTenantHandle>(ctx)`.
pub struct PgTenantHandle {
    database_name: String,
    conn: Mutex<PgConnection>,
}

impl PgTenantHandle {
    /// Exclusive access to the underlying connection for tenant queries.
    pub async fn connection(&self) -> MutexGuard<'_, PgConnection> {
        self.conn.lock().await
    }
}

#[async_trait]
impl TenantHandle for PgTenantHandle {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn current_database(&self) -> Result<String, TenantError> {
        let mut conn = self.connection().await;
        sqlx::query_scalar::<_, String>("SELECT current_database()")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| TenantError::TenantConnectionFailed {
                database: self.database_name.clone(),
                reason: e.to_string(),
            })
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(encrypt: bool) -> ConnectionDescriptor {
        ConnectionDescriptor {
            tenant_code: "HTL7".to_string(),
            server: "db.internal".to_string(),
            port: 6432,
            database: "Hotel7Db".to_string(),
            user_id: "hotel_app".to_string(),
            password: "secret".to_string(),
            encrypt,
            trust_server_certificate: true,
            multiple_active_result_sets: true,
        }
    }

    #[test]
    fn test_descriptor_maps_to_options() {
        let options = connect_options(&descriptor(true));
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_database(), Some("Hotel7Db"));
        assert_eq!(options.get_username(), "hotel_app");
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_unencrypted_descriptor_prefers_tls() {
        let options = connect_options(&descriptor(false));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Prefer));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_failure() {
        let mut d = descriptor(false);
        d.server = "127.0.0.1".to_string();
        d.port = 1;
        let connector = PgTenantConnector::new(Duration::from_secs(2));

        let err = connector.connect(&d).await.err().unwrap();
        assert!(matches!(
            err,
            TenantError::TenantConnectionFailed { ref database, .. } if database == "Hotel7Db"
        ));
    }
}
