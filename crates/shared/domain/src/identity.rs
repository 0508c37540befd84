use crate::constants::{ADMIN, EDUCATOR, GUEST, STUDENT};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role of a principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    Student,
    Educator,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => GUEST,
            Self::Student => STUDENT,
            Self::Educator => EDUCATOR,
            Self::Admin => ADMIN,
        }
    }

    #[must_use]
    pub const fn as_set(self) -> RoleSet {
        match self {
            Self::Guest => RoleSet::GUEST,
            Self::Student => RoleSet::STUDENT,
            Self::Educator => RoleSet::EDUCATOR,
            Self::Admin => RoleSet::ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            GUEST => Ok(Self::Guest),
            STUDENT => Ok(Self::Student),
            EDUCATOR => Ok(Self::Educator),
            ADMIN => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

bitflags! {
    /// A set of roles, used to express "role ∈ {..}" checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RoleSet: u8 {
        const GUEST = 1 << 0;
        const STUDENT = 1 << 1;
        const EDUCATOR = 1 << 2;
        const ADMIN = 1 << 3;

        /// Roles allowed to author courses.
        const AUTHORS = Self::EDUCATOR.bits() | Self::ADMIN.bits();
        /// Roles a visitor may pick for themselves at registration.
        const SELF_REGISTERED = Self::GUEST.bits() | Self::STUDENT.bits() | Self::EDUCATOR.bits();
    }
}

impl RoleSet {
    #[must_use]
    pub const fn admits(self, role: Role) -> bool {
        self.contains(role.as_set())
    }
}

/// The acting principal of a request. Immutable for the duration of the request.
///
/// Anonymous principals carry no id and are always treated as [`Role::Guest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    id: Option<String>,
    role: Role,
    authenticated: bool,
}

impl Principal {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { id: None, role: Role::Guest, authenticated: false }
    }

    /// A signed-in principal identified by email.
    #[must_use]
    pub fn authenticated(id: impl Into<String>, role: Role) -> Self {
        Self { id: Some(id.into()), role, authenticated: true }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The role that governs what this principal may see: guests when signed out.
    #[must_use]
    pub const fn effective_role(&self) -> Role {
        if self.authenticated { self.role } else { Role::Guest }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}
