//! # Rihua Auth
//!
//! Stateless token authentication for the Rihua API.
//!
//! This crate provides:
//!
//! - [`codec`]: signing and verification of claim sets ([`TokenCodec`])
//! - [`issuer`]: access and refresh token issuance ([`TokenIssuer`])
//! - [`validator`]: false-safe validity, kind and lifetime checks ([`TokenValidator`])
//! - [`claims`]: the signed claim set and [`TokenKind`]
//! - [`roles`]: the closed [`Role`] enumeration and the role intersection test
//! - [`principal`]: the request-scoped [`Principal`]
//!
//! It has no knowledge of HTTP; the web layer extracts bearer tokens and
//! hands them to the validator.
//!
//! # Token Types
//!
//! - **Access token**: short-lived, carries roles, email and language
//! - **Refresh token**: long-lived, carries only the subject, never authorizes a request
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chrono::Utc;
//! use rihua_auth::{Role, TokenCodec, TokenIssuer, TokenValidator};
//! use rihua_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let codec = Arc::new(TokenCodec::from_config(&config)?);
//! let issuer = TokenIssuer::new(codec.clone(), &config)?;
//! let validator = TokenValidator::new(codec);
//!
//! let token = issuer.issue_access_token("u1", "u1@example.com", &[Role::User], None, Utc::now())?;
//! assert!(validator.is_access_token(&token));
//! ```

pub mod claims;
pub mod codec;
pub mod issuer;
pub mod principal;
pub mod roles;
pub mod validator;

// Re-export commonly used types at crate root
pub use claims::{Claims, TokenKind};
pub use codec::{CodecError, DecodeError, MIN_SECRET_LENGTH, TokenCodec};
pub use issuer::{TokenIssuer, TokenPair};
pub use principal::Principal;
pub use roles::{ParseRoleError, Role, any_granted};
pub use validator::TokenValidator;
