use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::claims::Claims;
use crate::roles::{Role, any_granted};

/// Request-scoped identity built from a verified access token.
///
/// Never persisted and never shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Subject id from the token
    pub id: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub language: String,
}

impl Principal {
    /// Builds a principal from access-token claims.
    ///
    /// Returns `None` for any other token kind: a refresh token never yields
    /// an identity.
    pub fn from_access_claims(claims: Claims, default_language: &str) -> Option<Self> {
        if !claims.is_access() {
            return None;
        }

        let language = claims
            .language
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| default_language.to_string());

        Some(Self {
            id: claims.sub,
            email: claims.email.unwrap_or_default(),
            roles: claims.roles,
            language,
        })
    }

    /// Login name; the platform identifies users by email.
    pub fn username(&self) -> &str {
        &self.email
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        any_granted(&self.roles, roles)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    pub fn can_moderate(&self) -> bool {
        self.roles.iter().any(Role::can_moderate)
    }

    pub fn is_business(&self) -> bool {
        self.roles.iter().any(Role::can_use_business)
    }

    /// Highest-privilege role held, if any.
    pub fn highest_role(&self) -> Option<Role> {
        self.roles.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenKind;

    fn claims(kind: TokenKind, roles: Vec<Role>, language: Option<&str>) -> Claims {
        Claims {
            sub: "u1".to_string(),
            kind,
            roles,
            email: Some("u1@example.com".to_string()),
            language: language.map(str::to_string),
            iat: 1,
            exp: 2,
            jti: String::new(),
        }
    }

    fn resolve(kind: TokenKind, roles: Vec<Role>, language: Option<&str>) -> Option<Principal> {
        Principal::from_access_claims(claims(kind, roles, language), "zh-CN")
    }

    #[test]
    fn test_from_access_claims() {
        let principal = resolve(TokenKind::Access, vec![Role::User], Some("ja")).unwrap();

        assert_eq!(principal.id, "u1");
        assert_eq!(principal.username(), "u1@example.com");
        assert_eq!(principal.roles, vec![Role::User]);
        assert_eq!(principal.language, "ja");
    }

    #[test]
    fn test_refresh_and_unknown_claims_yield_nothing() {
        assert!(resolve(TokenKind::Refresh, vec![], None).is_none());
        assert!(resolve(TokenKind::Unknown, vec![Role::Admin], None).is_none());
    }

    #[test]
    fn test_language_defaults() {
        let principal = resolve(TokenKind::Access, vec![], None).unwrap();
        assert_eq!(principal.language, "zh-CN");

        let blank = claims(TokenKind::Access, vec![], Some(" "));
        let principal = Principal::from_access_claims(blank, "en").unwrap();
        assert_eq!(principal.language, "en");
    }

    #[test]
    fn test_role_checks() {
        let roles = vec![Role::User, Role::Moderator];
        let principal = resolve(TokenKind::Access, roles, None).unwrap();

        assert!(principal.has_role(Role::User));
        assert!(!principal.has_role(Role::Admin));
        assert!(principal.has_any_role(&[Role::Admin, Role::Moderator]));
        assert!(!principal.has_any_role(&[Role::Business]));
        assert!(principal.can_moderate());
        assert!(principal.is_business());
        assert!(!principal.is_admin());
        assert_eq!(principal.highest_role(), Some(Role::Moderator));
    }
}
