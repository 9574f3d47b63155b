//! User roles and the item-creation policy built on them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Privilege level attached to every user.
///
/// Variants are declared in ascending privilege so the derived ordering reads
/// `Viewer < User < Editor < Admin`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only account.
    Viewer,
    /// Default role for new registrations.
    #[default]
    User,
    /// Trusted contributor allowed to add catalogue entries by default.
    Editor,
    /// Superset of every other role.
    Admin,
}

impl Role {
    /// Stable lowercase name used in storage and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::User => "user",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Whether this role carries administrator privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{value}'; expected viewer|user|editor|admin")]
pub struct RoleParseError {
    value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "user" => Ok(Self::User),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Which roles may create catalogue entries.
///
/// `Admin` is always allowed regardless of the configured role list.
///
/// # Examples
/// ```
/// use minipedia::domain::{CreatorPolicy, Role};
///
/// let policy: CreatorPolicy = "editor".parse().expect("valid policy");
/// assert!(policy.allows(Role::Editor));
/// assert!(policy.allows(Role::Admin));
/// assert!(!policy.allows(Role::User));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorPolicy {
    /// Every authenticated user may create items.
    AnyUser,
    /// Only the listed roles (plus `Admin`) may create items.
    Roles(BTreeSet<Role>),
}

impl CreatorPolicy {
    /// Policy restricting creation to administrators.
    #[must_use]
    pub fn admin_only() -> Self {
        Self::Roles(BTreeSet::from([Role::Admin]))
    }

    /// Build a role-list policy; `Admin` is added when missing.
    #[must_use]
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut set: BTreeSet<Role> = roles.into_iter().collect();
        set.insert(Role::Admin);
        Self::Roles(set)
    }

    /// Whether a user holding `role` may create items.
    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Self::AnyUser => true,
            Self::Roles(set) => role.is_admin() || set.contains(&role),
        }
    }
}

impl Default for CreatorPolicy {
    fn default() -> Self {
        Self::roles([Role::Editor])
    }
}

impl fmt::Display for CreatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyUser => f.write_str("any"),
            Self::Roles(set) => {
                let names: Vec<&str> = set.iter().map(|role| role.as_str()).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Error returned when a creator policy string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreatorPolicyParseError {
    /// The policy string held no role names.
    #[error("creator policy must name at least one role or 'any'")]
    Empty,
    /// One of the listed names was not a role.
    #[error(transparent)]
    UnknownRole(#[from] RoleParseError),
}

impl FromStr for CreatorPolicy {
    type Err = CreatorPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("any") {
            return Ok(Self::AnyUser);
        }
        let roles = trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Role::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if roles.is_empty() {
            return Err(CreatorPolicyParseError::Empty);
        }
        Ok(Self::roles(roles))
    }
}
