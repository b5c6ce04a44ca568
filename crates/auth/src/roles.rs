use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role of an authenticated actor.
///
/// The set is closed: every user holds exactly one of these. Mapping roles to
/// permissions lives here so policy checks never compare role names directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    ProcurementCoordinator,
    PurchasingManager,
    Finance,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::ProcurementCoordinator,
        Role::PurchasingManager,
        Role::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::ProcurementCoordinator => "PROCUREMENT_COORDINATOR",
            Role::PurchasingManager => "PURCHASING_MANAGER",
            Role::Finance => "FINANCE",
        }
    }

    /// Permissions granted by this role.
    pub fn permissions(&self) -> Vec<Permission> {
        match self {
            Role::Admin => vec![Permission::WILDCARD],
            Role::PurchasingManager => vec![Permission::ORDERS_APPROVE, Permission::ORDERS_REJECT],
            Role::ProcurementCoordinator | Role::Finance => vec![],
        }
    }

    pub fn grants(&self, required: &Permission) -> bool {
        self.permissions()
            .iter()
            .any(|p| p.is_wildcard() || p == required)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches("ROLE_").to_ascii_uppercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}
