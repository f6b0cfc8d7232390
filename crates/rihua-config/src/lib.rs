//! # Rihua Config
//!
//! Configuration types for the Rihua API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing key and token lifetimes
//! - [`server`]: Bind address, authentication realm, locale fallback and file locations
//!
//! Both are read once at process start and never mutated afterwards.
//!
//! # Example
//!
//! ```ignore
//! use rihua_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use jwt::JwtConfig;
pub use server::ServerConfig;
