use std::{fmt::Display, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::const_config::user::USER_DEFAULT_ROLE;

use super::{permissions_for_role, Permissions};

/// The name of a role as stored by the backend and in the session
///
/// Any string is accepted, unknown roles simply get the fallback permissions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RoleName(String);

/// A role that can be offered to the user when creating or editing a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChoice {
    pub id: &'static str,
    pub name: &'static str,
}

impl RoleName {
    pub const CHOICES: [RoleChoice; 4] = [
        RoleChoice {
            id: "superadmin",
            name: "Super Admin",
        },
        RoleChoice {
            id: "admin",
            name: "Admin",
        },
        RoleChoice {
            id: "manager",
            name: "Manager",
        },
        RoleChoice {
            id: USER_DEFAULT_ROLE,
            name: "User",
        },
    ];

    pub fn permissions(&self) -> Permissions {
        permissions_for_role(&self.0)
    }

    /// Returns the display name if this is one of the [`RoleName::CHOICES`]
    pub fn display_name(&self) -> Option<&'static str> {
        Self::CHOICES
            .iter()
            .find(|choice| choice.id == self.0)
            .map(|choice| choice.name)
    }
}

impl Default for RoleName {
    fn default() -> Self {
        Self(USER_DEFAULT_ROLE.to_string())
    }
}

impl From<String> for RoleName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoleName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl Deref for RoleName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
