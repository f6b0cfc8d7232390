//! Static route policy table consulted by the authorization gate.
//!
//! Rules are evaluated top to bottom and the first rule whose method and path
//! pattern both match decides. Requests matching no rule fall through to
//! [`Requirement::Authenticated`].
//!
//! Path patterns use Ant-style segments:
//!
//! | Segment  | Matches                    |
//! |----------|----------------------------|
//! | `users`  | the literal segment        |
//! | `*`      | exactly one segment        |
//! | `{id}`   | exactly one segment        |
//! | `**`     | zero or more segments      |
//!
//! Trailing and repeated slashes are ignored on both sides.

use std::fmt;

use axum::http::Method;
use rihua_auth::{Principal, Role, any_granted};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` or `{name}`
    Single,
    /// `**`
    Multi,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw {
            "**" => Segment::Multi,
            "*" => Segment::Single,
            s if s.len() > 2 && s.starts_with('{') && s.ends_with('}') => Segment::Single,
            s => Segment::Literal(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            segments: split_path(pattern).map(Segment::parse).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &parts)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Multi, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => {
                let head_matches = match segment {
                    Segment::Literal(literal) => literal == head,
                    _ => true,
                };
                head_matches && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// What a route demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    /// Caller must hold at least one of these roles.
    AnyRole(Vec<Role>),
}

impl Requirement {
    pub fn any_of(roles: &[Role]) -> Self {
        Requirement::AnyRole(roles.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No principal, but the route requires one.
    Unauthenticated,
    /// Principal present but lacking a required role.
    Forbidden,
}

#[derive(Debug, Clone)]
pub struct PolicyRule {
    /// `None` matches every method.
    pub method: Option<Method>,
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

impl PolicyRule {
    pub fn new(method: Option<Method>, pattern: &str, requirement: Requirement) -> Self {
        Self {
            method,
            pattern: PathPattern::new(pattern),
            requirement,
        }
    }

    pub fn any_method(pattern: &str, requirement: Requirement) -> Self {
        Self::new(None, pattern, requirement)
    }

    pub fn for_method(method: Method, pattern: &str, requirement: Requirement) -> Self {
        Self::new(Some(method), pattern, requirement)
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone)]
pub struct RoutePolicyTable {
    rules: Vec<PolicyRule>,
    fallback: Requirement,
}

impl RoutePolicyTable {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self {
            rules,
            fallback: Requirement::Authenticated,
        }
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// The requirement of the first matching rule, or `Authenticated`.
    pub fn requirement_for(&self, method: &Method, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.requirement)
            .unwrap_or(&self.fallback)
    }

    pub fn decide(&self, principal: Option<&Principal>, method: &Method, path: &str) -> Decision {
        match (self.requirement_for(method, path), principal) {
            (Requirement::Public, _) => Decision::Allow,
            (_, None) => Decision::Unauthenticated,
            (Requirement::Authenticated, Some(_)) => Decision::Allow,
            (Requirement::AnyRole(required), Some(principal)) => {
                if any_granted(&principal.roles, required) {
                    Decision::Allow
                } else {
                    Decision::Forbidden
                }
            }
        }
    }

    /// Rules for the Rihua community platform API.
    pub fn rihua_default() -> Self {
        use Requirement::{AnyRole, Public};

        let admin = || AnyRole(vec![Role::Admin, Role::SuperAdmin]);
        let business = || AnyRole(vec![Role::Business, Role::Admin, Role::SuperAdmin]);

        let mut rules = vec![
            // Authentication
            PolicyRule::for_method(Method::POST, "/api/v1/auth/**", Public),
            PolicyRule::for_method(Method::GET, "/api/v1/auth/verify-email", Public),
            PolicyRule::for_method(Method::POST, "/api/v1/auth/reset-password", Public),
            // Operations
            PolicyRule::any_method("/actuator/health", Public),
            PolicyRule::any_method("/actuator/info", Public),
            PolicyRule::any_method("/actuator/**", admin()),
            // Documentation
            PolicyRule::any_method("/api-docs/**", Public),
            PolicyRule::any_method("/swagger-ui/**", Public),
            PolicyRule::any_method("/swagger-ui.html", Public),
            PolicyRule::any_method("/scalar/**", Public),
            PolicyRule::any_method("/favicon.ico", Public),
            PolicyRule::any_method("/error", Public),
        ];

        // Public read-only listings
        for resource in ["events", "housing", "jobs", "forum/posts"] {
            rules.push(PolicyRule::for_method(
                Method::GET,
                &format!("/api/v1/{resource}"),
                Public,
            ));
            rules.push(PolicyRule::for_method(
                Method::GET,
                &format!("/api/v1/{resource}/{{id}}"),
                Public,
            ));
        }

        rules.extend([
            PolicyRule::any_method("/api/v1/admin/**", admin()),
            PolicyRule::for_method(Method::POST, "/api/v1/events", business()),
            PolicyRule::for_method(Method::PUT, "/api/v1/events/**", business()),
            PolicyRule::for_method(Method::DELETE, "/api/v1/events/**", business()),
            PolicyRule::for_method(
                Method::POST,
                "/api/v1/housing",
                AnyRole(vec![Role::Business, Role::User, Role::Admin, Role::SuperAdmin]),
            ),
            PolicyRule::for_method(Method::POST, "/api/v1/jobs", business()),
        ]);

        Self::new(rules)
    }
}

impl Default for RoutePolicyTable {
    fn default() -> Self {
        Self::rihua_default()
    }
}
