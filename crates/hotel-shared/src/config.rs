//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::constants::{
    DEFAULT_JWT_AUDIENCE, DEFAULT_JWT_ISSUER, DEFAULT_LOOKUP_TIMEOUT_MS,
    DEFAULT_TOKEN_EXPIRATION_MINUTES, MIN_JWT_SECRET_LENGTH,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub tenant_database: TenantDatabaseSettings,
    pub jwt: JwtSettings,
    pub resolver: ResolverSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

/// Central (master) database holding the tenant directory and users.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Apply the bundled master schema migrations at startup.
    #[serde(default)]
    pub run_migrations: bool,
}

/// Credentials shared by every per-tenant database. Values are optional here
/// so that a missing one surfaces as a configuration error at the point where
/// a tenant connection is built, naming the missing key.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TenantDatabaseSettings {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub user_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverSettings {
    pub lookup_timeout_ms: u64,
}

impl ResolverSettings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms.max(1))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "hotel-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", false)?
            .set_default("jwt.issuer", DEFAULT_JWT_ISSUER)?
            .set_default("jwt.audience", DEFAULT_JWT_AUDIENCE)?
            .set_default("jwt.expiration_minutes", DEFAULT_TOKEN_EXPIRATION_MINUTES)?
            .set_default("resolver.lookup_timeout_ms", DEFAULT_LOOKUP_TIMEOUT_MS)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(AppError::InvalidSetting {
                key: "jwt.secret",
                reason: "must not be empty".to_string(),
            });
        }
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            warn!(
                "jwt.secret is shorter than {} bytes; use a longer signing secret",
                MIN_JWT_SECRET_LENGTH
            );
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(AppError::InvalidSetting {
                key: "jwt.expiration_minutes",
                reason: format!("must be positive, got {}", self.jwt.expiration_minutes),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from_str(toml: &str) -> Result<AppConfig, AppError> {
        let config = AppConfig::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let cfg = load_from_str(
            r#"
            [database]
            url = "postgres://localhost/master"

            [jwt]
            secret = "a-signing-secret-that-is-long-enough!"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.app.port, 8080);
        assert_eq!(cfg.jwt.issuer, DEFAULT_JWT_ISSUER);
        assert_eq!(cfg.jwt.expiration_minutes, DEFAULT_TOKEN_EXPIRATION_MINUTES);
        assert_eq!(cfg.resolver.lookup_timeout(), Duration::from_millis(5_000));
        assert!(cfg.tenant_database.server.is_none());
        assert!(!cfg.database.run_migrations);
    }

    #[test]
    fn test_tenant_database_section() {
        let cfg = load_from_str(
            r#"
            [database]
            url = "postgres://localhost/master"

            [tenant_database]
            server = "db.internal"
            port = 6432
            user_id = "hotel_app"
            password = "s3cret"

            [jwt]
            secret = "a-signing-secret-that-is-long-enough!"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tenant_database.server.as_deref(), Some("db.internal"));
        assert_eq!(cfg.tenant_database.port, Some(6432));
    }

    #[test]
    fn test_empty_jwt_secret_rejected() {
        let result = load_from_str(
            r#"
            [database]
            url = "postgres://localhost/master"

            [jwt]
            secret = "  "
            "#,
        );
        assert!(matches!(
            result,
            Err(AppError::InvalidSetting { key: "jwt.secret", .. })
        ));
    }
}
