//! Hotel listing for the tenant selection endpoints

use std::sync::Arc;

use hotel_shared::constants::FULL_ACCESS_ROLES;
use tracing::info;

use crate::domain::{RequestClaims, Tenant, TenantSummary};
use crate::error::DomainError;
use crate::repositories::TenantDirectory;

pub struct TenantService {
    directory: Arc<dyn TenantDirectory>,
}

impl TenantService {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    /// Hotels visible to the caller. Admin, Manager and Accountant see every
    /// hotel; everyone else sees only the hotels assigned to them.
    pub async fn hotels_for(
        &self,
        user_id: i32,
        claims: &RequestClaims,
    ) -> Result<Vec<TenantSummary>, DomainError> {
        let tenants = if claims.has_any_role(&FULL_ACCESS_ROLES) {
            self.directory.list_all().await?
        } else {
            self.directory.list_for_user(user_id).await?
        };

        info!(user_id, count = tenants.len(), "Listed hotels for user");
        Ok(summaries(tenants))
    }

    pub async fn hotel_by_code(&self, code: &str) -> Result<Option<TenantSummary>, DomainError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        Ok(self
            .directory
            .find_by_code(code)
            .await?
            .map(|t| t.summary()))
    }
}

fn summaries(mut tenants: Vec<Tenant>) -> Vec<TenantSummary> {
    tenants.sort_by_key(|t| t.id);
    tenants.iter().map(TenantSummary::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockTenantDirectory;
    use mockall::predicate::eq;

    fn tenant(id: i32) -> Tenant {
        Tenant {
            id,
            code: format!("HTL{}", id),
            name: format!("Hotel {}", id),
            database_name: format!("Hotel{}Db", id),
            base_url: None,
            enable_queue_mode: false,
            enable_queue_worker: false,
            queue_worker_interval_seconds: None,
            queue_worker_batch_size: None,
            use_queue_middleware: false,
            default_partner: None,
        }
    }

    fn claims(roles: &str) -> RequestClaims {
        RequestClaims::new(Some("42"), Some("7"), Some("sara"), Some(roles))
    }

    #[tokio::test]
    async fn test_full_access_role_sees_all_hotels() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![tenant(9), tenant(3), tenant(7)]));
        directory.expect_list_for_user().never();

        let hotels = TenantService::new(Arc::new(directory))
            .hotels_for(42, &claims("accountant"))
            .await
            .unwrap();

        let ids: Vec<i32> = hotels.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[tokio::test]
    async fn test_other_roles_see_assigned_hotels() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_list_all().never();
        directory
            .expect_list_for_user()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(vec![tenant(7)]));

        let hotels = TenantService::new(Arc::new(directory))
            .hotels_for(42, &claims("Staff"))
            .await
            .unwrap();

        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].code, "HTL7");
    }

    #[tokio::test]
    async fn test_blank_code_is_not_found() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find_by_code().never();

        let found = TenantService::new(Arc::new(directory))
            .hotel_by_code("  ")
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
