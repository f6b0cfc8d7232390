//! Closed set of platform roles.
//!
//! Roles travel inside access tokens and are compared by the route policy
//! table. Both sides use this enum, so issuance and authorization cannot drift
//! apart on spelling. The canonical string form is the bare upper-case name
//! (`ADMIN`); the legacy authority form (`ROLE_ADMIN`) is accepted on input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

const LEGACY_PREFIX: &str = "ROLE_";

/// Platform role, ordered from least to most privileged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular community member
    #[serde(alias = "ROLE_USER")]
    User,
    /// May publish events and job offers
    #[serde(alias = "ROLE_BUSINESS")]
    Business,
    /// Content moderation
    #[serde(alias = "ROLE_MODERATOR")]
    Moderator,
    /// Full administrative access
    #[serde(alias = "ROLE_ADMIN")]
    Admin,
    /// System administration
    #[serde(alias = "ROLE_SUPER_ADMIN")]
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Business,
        Role::Moderator,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Business => "BUSINESS",
            Role::Moderator => "MODERATOR",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Privilege level, higher means more privileged.
    pub fn level(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Business => 1,
            Role::Moderator => 2,
            Role::Admin => 3,
            Role::SuperAdmin => 4,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn can_moderate(&self) -> bool {
        *self == Role::Moderator || self.is_admin()
    }

    pub fn can_use_business(&self) -> bool {
        *self == Role::Business || self.can_moderate()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix(LEGACY_PREFIX).unwrap_or(trimmed);

        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// The single intersection test used for role-based decisions.
///
/// Returns `true` when `held` contains at least one of `required`. An empty
/// `required` set grants nothing.
pub fn any_granted(held: &[Role], required: &[Role]) -> bool {
    required.iter().any(|r| held.contains(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_canonical_names() {
        let json = serde_json::to_string(&vec![Role::User, Role::SuperAdmin]).unwrap();
        assert_eq!(json, r#"["USER","SUPER_ADMIN"]"#);
    }

    #[test]
    fn test_deserialize_legacy_authority_names() {
        let roles: Vec<Role> = serde_json::from_str(r#"["ROLE_ADMIN","BUSINESS"]"#).unwrap();
        assert_eq!(roles, vec![Role::Admin, Role::Business]);
    }

    #[test]
    fn test_deserialize_unknown_role_fails() {
        assert!(serde_json::from_str::<Role>(r#""ROOT""#).is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("ROLE_MODERATOR".parse::<Role>().unwrap(), Role::Moderator);
        assert_eq!(" super_admin ".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(
            "janitor".parse::<Role>(),
            Err(ParseRoleError("janitor".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_ordering_follows_privilege() {
        assert!(Role::User < Role::Business);
        assert!(Role::Business < Role::Moderator);
        assert!(Role::Moderator < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
        for pair in Role::ALL.windows(2) {
            assert!(pair[0].level() < pair[1].level());
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Moderator.is_admin());
        assert!(Role::Moderator.can_moderate());
        assert!(!Role::Business.can_moderate());
        assert!(Role::Admin.can_use_business());
        assert!(!Role::User.can_use_business());
    }

    #[test]
    fn test_any_granted() {
        assert!(any_granted(&[Role::User, Role::Admin], &[Role::Admin]));
        assert!(!any_granted(&[Role::User], &[Role::Business, Role::Admin]));
        assert!(!any_granted(&[Role::Admin], &[]));
        assert!(!any_granted(&[], &[Role::User]));
    }
}
