//! Identity attributes taken from a validated bearer token.

use hotel_shared::utils::{non_blank, split_roles};

/// Claims for the current request. Every field is absent when the request
/// carried no token or an invalid one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestClaims {
    pub user_id: Option<String>,
    pub tenant_id: Option<String>,
    pub username: Option<String>,
    pub roles: Vec<String>,
}

impl RequestClaims {
    pub fn new(
        user_id: Option<&str>,
        tenant_id: Option<&str>,
        username: Option<&str>,
        roles: Option<&str>,
    ) -> Self {
        Self {
            user_id: non_blank(user_id),
            tenant_id: non_blank(tenant_id),
            username: non_blank(username),
            roles: roles.map(split_roles).unwrap_or_default(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.tenant_id.is_none()
    }

    /// The tenant id claim, when it parses as a positive integer.
    pub fn tenant_id_number(&self) -> Option<i32> {
        self.tenant_id
            .as_deref()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|id| *id > 0)
    }

    pub fn user_id_number(&self) -> Option<i32> {
        self.user_id.as_deref().and_then(|v| v.parse::<i32>().ok())
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.roles
            .iter()
            .any(|r| roles.iter().any(|wanted| r.eq_ignore_ascii_case(wanted)))
    }

    /// User id for log lines.
    pub fn user_label(&self) -> &str {
        self.user_id.as_deref().unwrap_or("Unknown")
    }
}
