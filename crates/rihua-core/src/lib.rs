//! # Rihua Core
//!
//! Core types, errors, and utilities for the Rihua API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type and the fixed-shape error body returned to clients
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use rihua_core::errors::{AppError, ErrorResponse};
//! use rihua_core::password::verify_password;
//!
//! // Create an error
//! let error = AppError::unauthorized("Invalid email or password");
//!
//! // Check a password against a stored hash
//! let matches = verify_password("secret", &stored_hash)?;
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_dummy_password, verify_password};
