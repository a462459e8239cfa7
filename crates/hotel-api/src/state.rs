//! Shared application state

use std::sync::Arc;

use hotel_core::repositories::{MasterUserRepository, TenantDirectory};
use hotel_core::services::{
    AuthService, ConnectionStringBuilder, TenantConnector, TenantDatabaseProvider,
    TenantResolver, TenantService,
};
use hotel_security::JwtService;
use hotel_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtService>,
    pub databases: Arc<TenantDatabaseProvider>,
    pub tenants: Arc<TenantService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        directory: Arc<dyn TenantDirectory>,
        users: Arc<dyn MasterUserRepository>,
        connector: Arc<dyn TenantConnector>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt));
        let resolver = Arc::new(TenantResolver::new(
            directory.clone(),
            config.resolver.lookup_timeout(),
        ));
        let databases = Arc::new(TenantDatabaseProvider::new(
            resolver,
            ConnectionStringBuilder::new(config.tenant_database.clone()),
            connector,
        ));

        Self {
            tenants: Arc::new(TenantService::new(directory.clone())),
            auth: Arc::new(AuthService::new(users, directory, jwt.clone())),
            jwt,
            databases,
        }
    }

    pub fn resolver(&self) -> &TenantResolver {
        self.databases.resolver()
    }
}
