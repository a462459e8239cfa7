//! Master user repository trait (port)

use async_trait::async_trait;
use crate::domain::MasterUser;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MasterUserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<MasterUser>, DomainError>;

    /// Role codes granted to the user.
    async fn roles_for(&self, user_id: i32) -> Result<Vec<String>, DomainError>;
}
