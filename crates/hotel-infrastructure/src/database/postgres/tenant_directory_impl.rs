// ============================================================================
// Hotel Infrastructure - PostgreSQL Tenant Directory
// File: crates/hotel-infrastructure/src/database/postgres/tenant_directory_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::error;

use hotel_core::domain::Tenant;
use hotel_core::error::DomainError;
use hotel_core::repositories::TenantDirectory;

pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub database_name: Option<String>,
    pub base_url: Option<String>,
    pub enable_queue_mode: bool,
    pub enable_queue_worker: bool,
    pub queue_worker_interval_seconds: Option<i32>,
    pub queue_worker_batch_size: Option<i32>,
    pub use_queue_middleware: bool,
    pub default_partner: Option<String>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            code: row.code,
            name: row.name,
            database_name: row.database_name.unwrap_or_default(),
            base_url: row.base_url,
            enable_queue_mode: row.enable_queue_mode,
            enable_queue_worker: row.enable_queue_worker,
            queue_worker_interval_seconds: row.queue_worker_interval_seconds,
            queue_worker_batch_size: row.queue_worker_batch_size,
            use_queue_middleware: row.use_queue_middleware,
            default_partner: row.default_partner,
        }
    }
}

const TENANT_COLUMNS: &str = r#"
    t.id, t.code, t.name, t.database_name, t.base_url,
    t.enable_queue_mode, t.enable_queue_worker,
    t.queue_worker_interval_seconds, t.queue_worker_batch_size,
    t.use_queue_middleware, t.default_partner
"#;

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_by_id(&self, id: i32) -> Result<Option<Tenant>, DomainError> {
        let sql = format!("SELECT {} FROM tenants t WHERE t.id = $1", TENANT_COLUMNS);
        let row: Option<TenantRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tenant by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>, DomainError> {
        let sql = format!(
            "SELECT {} FROM tenants t WHERE LOWER(t.code) = LOWER($1)",
            TENANT_COLUMNS
        );
        let row: Option<TenantRow> = sqlx::query_as(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tenant by code"))?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError> {
        let sql = format!("SELECT {} FROM tenants t ORDER BY t.id", TENANT_COLUMNS);
        let rows: Vec<TenantRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("listing tenants"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Tenant>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM tenants t
            INNER JOIN user_tenants ut ON ut.tenant_id = t.id
            WHERE ut.user_id = $1
            ORDER BY t.id
            "#,
            TENANT_COLUMNS
        );
        let rows: Vec<TenantRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("listing tenants for user"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
