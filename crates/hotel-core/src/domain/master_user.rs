//! Master user entity (central database login account)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterUser {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub tenant_id: i32,
    pub is_active: bool,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub employee_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MasterUser {
    pub fn has_tenant(&self) -> bool {
        self.tenant_id > 0
    }

    pub fn has_password(&self) -> bool {
        !self.password_hash.trim().is_empty()
    }
}
