// ============================================================================
// Hotel Core - Tenant Database Provider
// File: crates/hotel-core/src/services/tenant_database.rs
// ============================================================================
//! Per-request access to the current tenant's database.
//!
//! The handle is opened lazily on first use, reused for the rest of the
//! request, and released when the request's [`ResolutionContext`] is dropped.

use std::any::{type_name, Any};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::error::TenantError;
use crate::services::connection_builder::{ConnectionDescriptor, ConnectionStringBuilder};
use crate::services::tenant_resolver::{ResolutionContext, TenantResolver};

/// An open session against one tenant database.
#[async_trait]
pub trait TenantHandle: Send + Sync {
    /// Database this handle was opened for.
    fn database_name(&self) -> &str;

    /// Database the server reports as current for this session.
    async fn current_database(&self) -> Result<String, TenantError>;

    /// Upcast used by [`TenantDatabaseProvider::database_as`] to recover the
    /// connector's concrete handle type.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Opens sessions against tenant databases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantConnector: Send + Sync {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn TenantHandle>, TenantError>;
}

/// Result of the diagnostic connection check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub tenant_code: String,
    pub expected_database: String,
    pub actual_database: String,
    pub matches: bool,
}

pub struct TenantDatabaseProvider {
    resolver: Arc<TenantResolver>,
    builder: ConnectionStringBuilder,
    connector: Arc<dyn TenantConnector>,
}

impl TenantDatabaseProvider {
    pub fn new(
        resolver: Arc<TenantResolver>,
        builder: ConnectionStringBuilder,
        connector: Arc<dyn TenantConnector>,
    ) -> Self {
        Self {
            resolver,
            builder,
            connector,
        }
    }

    pub fn resolver(&self) -> &Arc<TenantResolver> {
        &self.resolver
    }

    /// Handle to the current tenant's database. Resolves the tenant and opens
    /// the connection on first call; later calls in the same request get the
    /// same handle.
    pub async fn database(
        &self,
        ctx: &ResolutionContext,
    ) -> Result<Arc<dyn TenantHandle>, TenantError> {
        ctx.handle
            .get_or_try_init(|| async {
                let tenant = self.resolver.resolve(ctx).await?;
                let descriptor = self.builder.build(&tenant)?;

                let handle = self.connector.connect(&descriptor).await.map_err(|e| {
                    error!(
                        tenant_code = %tenant.code,
                        database = %descriptor.database,
                        "Failed to open tenant database: {}", e
                    );
                    e
                })?;

                info!(
                    tenant_code = %tenant.code,
                    database = %descriptor.database,
                    "Opened tenant database for request"
                );
                Ok::<_, TenantError>(handle)
            })
            .await
            .cloned()
    }

    /// The request's handle as the connector's concrete type, for running
    /// tenant queries. Shares the memoized handle with [`database`](Self::database).
    pub async fn database_as<H: TenantHandle + 'static>(
        &self,
        ctx: &ResolutionContext,
    ) -> Result<Arc<H>, TenantError> {
        self.database(ctx).await?.into_any().downcast::<H>().map_err(|_| {
            error!(expected = type_name::<H>(), "Tenant handle has an unexpected type");
            TenantError::Configuration("tenant connector handle type")
        })
    }

    /// Compares the database the session actually landed on with the one the
    /// tenant record names.
    pub async fn verify(&self, ctx: &ResolutionContext) -> Result<ConnectionCheck, TenantError> {
        let tenant = self.resolver.resolve(ctx).await?;
        let handle = self.database(ctx).await?;
        let actual = handle.current_database().await?;

        let matches = actual.eq_ignore_ascii_case(tenant.database_name.trim());
        if !matches {
            error!(
                tenant_code = %tenant.code,
                expected = %tenant.database_name,
                actual = %actual,
                "Tenant database mismatch"
            );
        }

        Ok(ConnectionCheck {
            tenant_code: tenant.code.clone(),
            expected_database: tenant.database_name.clone(),
            actual_database: actual,
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RequestClaims, Tenant};
    use crate::repositories::MockTenantDirectory;
    use hotel_shared::config::TenantDatabaseSettings;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedHandle {
        database: String,
        reported: String,
    }

    #[async_trait]
    impl TenantHandle for FixedHandle {
        fn database_name(&self) -> &str {
            &self.database
        }

        async fn current_database(&self) -> Result<String, TenantError> {
            Ok(self.reported.clone())
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    impl FixedHandle {
        /// Stand-in for a tenant query; answers with the database it ran against.
        fn run(&self, sql: &str) -> String {
            format!("{}: {}", self.database, sql)
        }
    }

    struct OtherHandle;

    #[async_trait]
    impl TenantHandle for OtherHandle {
        fn database_name(&self) -> &str {
            "other"
        }

        async fn current_database(&self) -> Result<String, TenantError> {
            Ok("other".to_string())
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    /// Counts connects and optionally reports a different current database.
    struct CountingConnector {
        connects: AtomicUsize,
        report_as: Option<String>,
    }

    impl CountingConnector {
        fn new(report_as: Option<&str>) -> Self {
            Self {
                connects: AtomicUsize::new(0),
                report_as: report_as.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl TenantConnector for CountingConnector {
        async fn connect(
            &self,
            descriptor: &ConnectionDescriptor,
        ) -> Result<Arc<dyn TenantHandle>, TenantError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedHandle {
                database: descriptor.database.clone(),
                reported: self
                    .report_as
                    .clone()
                    .unwrap_or_else(|| descriptor.database.clone()),
            }))
        }
    }

    fn tenant(id: i32, code: &str, database_name: &str) -> Tenant {
        Tenant {
            id,
            code: code.to_string(),
            name: format!("Hotel {}", id),
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

    fn settings() -> TenantDatabaseSettings {
        TenantDatabaseSettings {
            server: Some("db.internal".to_string()),
            port: Some(5432),
            user_id: Some("hotel_app".to_string()),
            password: Some("secret".to_string()),
        }
    }

    fn provider(
        directory: MockTenantDirectory,
        settings: TenantDatabaseSettings,
        connector: Arc<dyn TenantConnector>,
    ) -> TenantDatabaseProvider {
        let resolver = Arc::new(TenantResolver::new(Arc::new(directory), Duration::from_secs(1)));
        TenantDatabaseProvider::new(resolver, ConnectionStringBuilder::new(settings), connector)
    }

    fn header_ctx(code: &str) -> ResolutionContext {
        ResolutionContext::new(RequestClaims::default(), Some(code.to_string()))
    }

    #[tokio::test]
    async fn test_handle_is_reused_within_a_request() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let connector = Arc::new(CountingConnector::new(None));
        let provider = provider(directory, settings(), connector.clone());

        let ctx = header_ctx("HTL7");
        let first = provider.database(&ctx).await.unwrap();
        let second = provider.database(&ctx).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.database_name(), "Hotel7Db");
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_handle() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .withf(|code| code == "HTL7")
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        directory
            .expect_find_by_code()
            .withf(|code| code == "HTL9")
            .returning(|_| Ok(Some(tenant(9, "HTL9", "Hotel9Db"))));
        let connector = Arc::new(CountingConnector::new(None));
        let provider = provider(directory, settings(), connector.clone());

        let a = provider.database(&header_ctx("HTL7")).await.unwrap();
        let b = provider.database(&header_ctx("HTL9")).await.unwrap();

        assert_eq!(a.database_name(), "Hotel7Db");
        assert_eq!(b.database_name(), "Hotel9Db");
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolution_failure_never_connects() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find_by_code().returning(|_| Ok(None));
        let mut connector = MockTenantConnector::new();
        connector.expect_connect().never();
        let provider = provider(directory, settings(), Arc::new(connector));

        let err = provider.database(&header_ctx("GHOST")).await.err().unwrap();
        assert_eq!(err, TenantError::TenantNotFound("GHOST".to_string()));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_connect() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let mut connector = MockTenantConnector::new();
        connector.expect_connect().never();
        let mut settings = settings();
        settings.user_id = None;
        let provider = provider(directory, settings, Arc::new(connector));

        let err = provider.database(&header_ctx("HTL7")).await.err().unwrap();
        assert_eq!(err, TenantError::Configuration("tenant_database.user_id"));
    }

    #[tokio::test]
    async fn test_failed_connect_is_retried_in_same_request() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let mut connector = MockTenantConnector::new();
        let mut seq = mockall::Sequence::new();
        connector
            .expect_connect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|d| {
                Err(TenantError::TenantConnectionFailed {
                    database: d.database.clone(),
                    reason: "refused".to_string(),
                })
            });
        connector
            .expect_connect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|d| {
                let handle: Arc<dyn TenantHandle> = Arc::new(FixedHandle {
                    database: d.database.clone(),
                    reported: d.database.clone(),
                });
                Ok::<_, TenantError>(handle)
            });
        let provider = provider(directory, settings(), Arc::new(connector));

        let ctx = header_ctx("HTL7");
        let err = provider.database(&ctx).await.err().unwrap();
        assert!(err.is_transient());
        assert!(provider.database(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_reports_match() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let provider = provider(directory, settings(), Arc::new(CountingConnector::new(None)));

        let check = provider.verify(&header_ctx("HTL7")).await.unwrap();
        assert_eq!(
            check,
            ConnectionCheck {
                tenant_code: "HTL7".to_string(),
                expected_database: "Hotel7Db".to_string(),
                actual_database: "Hotel7Db".to_string(),
                matches: true,
            }
        );
    }

    #[tokio::test]
    async fn test_verify_reports_mismatch() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let connector = Arc::new(CountingConnector::new(Some("postgres")));
        let provider = provider(directory, settings(), connector);

        let check = provider.verify(&header_ctx("HTL7")).await.unwrap();
        assert!(!check.matches);
        assert_eq!(check.actual_database, "postgres");
    }

    #[tokio::test]
    async fn test_typed_handle_runs_queries_on_the_shared_connection() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let connector = Arc::new(CountingConnector::new(None));
        let provider = provider(directory, settings(), connector.clone());

        let ctx = header_ctx("HTL7");
        let typed = provider.database_as::<FixedHandle>(&ctx).await.unwrap();
        let shared = provider.database(&ctx).await.unwrap();

        assert_eq!(typed.run("SELECT 1"), "Hotel7Db: SELECT 1");
        assert_eq!(
            Arc::as_ptr(&typed) as *const (),
            Arc::as_ptr(&shared) as *const ()
        );
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_typed_handle_of_wrong_type_is_configuration_error() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_code()
            .returning(|_| Ok(Some(tenant(7, "HTL7", "Hotel7Db"))));
        let provider = provider(directory, settings(), Arc::new(CountingConnector::new(None)));

        let err = provider
            .database_as::<OtherHandle>(&header_ctx("HTL7"))
            .await
            .err()
            .unwrap();
        assert_eq!(err, TenantError::Configuration("tenant connector handle type"));
    }
}
