use rihua_auth::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn enabled_by_default() -> bool {
    true
}

/// A user as seen by the login flow.
///
/// This is also the record format of the seed users file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub id: String,
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub locked: bool,
}

impl UserCredentials {
    pub fn can_sign_in(&self) -> bool {
        self.enabled && !self.locked
    }
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("enabled", &self.enabled)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_record_defaults() {
        let json = r#"{"id":"u1","email":"u1@example.com","password_hash":"$2b$04$x"}"#;
        let user: UserCredentials = serde_json::from_str(json).unwrap();

        assert!(user.roles.is_empty());
        assert!(user.preferred_language.is_none());
        assert!(user.enabled);
        assert!(!user.locked);
        assert!(user.can_sign_in());
    }

    #[test]
    fn test_roles_accept_legacy_prefix() {
        let json = r#"{"id":"u1","email":"e","password_hash":"h","roles":["ROLE_ADMIN","USER"],"locked":true}"#;
        let user: UserCredentials = serde_json::from_str(json).unwrap();

        assert_eq!(user.roles, vec![Role::Admin, Role::User]);
        assert!(!user.can_sign_in());
    }

    #[test]
    fn test_debug_hides_hash() {
        let user = UserCredentials {
            id: "u1".to_string(),
            email: "e".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            roles: vec![],
            preferred_language: None,
            enabled: true,
            locked: false,
        };
        assert!(!format!("{user:?}").contains("secret"));
    }
}
