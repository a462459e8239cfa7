// ============================================================================
// Hotel Infrastructure - PostgreSQL Master User Repository
// File: crates/hotel-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;

use hotel_core::domain::MasterUser;
use hotel_core::error::DomainError;
use hotel_core::repositories::MasterUserRepository;

pub struct PgMasterUserRepository {
    pool: PgPool,
}

impl PgMasterUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MasterUserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: Option<String>,
    pub tenant_id: i32,
    pub is_active: bool,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub employee_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MasterUserRow> for MasterUser {
    fn from(row: MasterUserRow) -> Self {
        MasterUser {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash.unwrap_or_default(),
            tenant_id: row.tenant_id,
            is_active: row.is_active,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            employee_number: row.employee_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MasterUserRepository for PgMasterUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<MasterUser>, DomainError> {
        let row: Option<MasterUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, username, password_hash, tenant_id, is_active,
                full_name, email, phone_number, employee_number,
                created_at, updated_at
            FROM master_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding master user by username: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn roles_for(&self, user_id: i32) -> Result<Vec<String>, DomainError> {
        let roles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.code
            FROM user_roles ur
            INNER JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.code
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error loading roles for user {}: {}", user_id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(roles)
    }
}
