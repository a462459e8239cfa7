// ============================================================================
// Hotel Core - Authentication Service
// File: crates/hotel-core/src/services/auth_service.rs
// ============================================================================
//! Master-database login issuing tenant-scoped bearer tokens

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use hotel_security::jwt::JwtService;
use hotel_security::password::PasswordService;

use crate::domain::MasterUser;
use crate::error::DomainError;
use crate::repositories::{MasterUserRepository, TenantDirectory};

/// Authentication service for the login flow
pub struct AuthService {
    users: Arc<dyn MasterUserRepository>,
    directory: Arc<dyn TenantDirectory>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn MasterUserRepository>,
        directory: Arc<dyn TenantDirectory>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            directory,
            jwt,
        }
    }

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        info!("Login attempt for username: {}", username);

        // 1. Find user
        let user = self.users.find_by_username(username).await?.ok_or_else(|| {
            warn!("Login failed: username not found: {}", username);
            DomainError::InvalidCredentials
        })?;

        // 2. Verify password
        if !user.has_password() {
            warn!("Login failed: no password set for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }
        if !user.is_active {
            warn!("Login failed: user is not active: {}", username);
            return Err(DomainError::UserNotActive);
        }

        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|e| {
                warn!("Login failed: stored hash unreadable for {}: {}", username, e);
                DomainError::InvalidCredentials
            })?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Every account must belong to a hotel; checked after the password
        if !user.has_tenant() {
            error!(
                user_id = user.id,
                tenant_id = user.tenant_id,
                "Login failed: user has no valid tenant assignment"
            );
            return Err(DomainError::InvalidTenantAssignment {
                username: user.username.clone(),
                tenant_id: user.tenant_id,
            });
        }

        // 4. Roles and token
        let roles = self.users.roles_for(user.id).await?;
        let issued = self
            .jwt
            .generate_token(user.id, &user.username, user.tenant_id, &roles)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        // 5. Hotel details are informational; a missing row does not fail login
        let tenant = match self.directory.find_by_id(user.tenant_id).await {
            Ok(tenant) => tenant,
            Err(e) => {
                error!("Failed to load tenant {} for login: {}", user.tenant_id, e);
                None
            }
        };

        info!(
            user_id = user.id,
            tenant_id = user.tenant_id,
            "Login successful for: {}", username
        );

        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user: UserInfo::from(&user),
            tenant_code: tenant.as_ref().map(|t| t.code.clone()),
            tenant_name: tenant.as_ref().map(|t| t.name.clone()),
            roles,
        })
    }
}

/// Result of successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
    pub tenant_code: Option<String>,
    pub tenant_name: Option<String>,
    pub roles: Vec<String>,
}

/// User info returned in auth responses
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub tenant_id: i32,
}

impl From<&MasterUser> for UserInfo {
    fn from(user: &MasterUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            tenant_id: user.tenant_id,
        }
    }
}
