//! Request authentication and authorization.
//!
//! # Modules
//!
//! - [`auth`]: bearer token extraction, identity resolution, `AuthUser`
//! - [`policy`]: route policy table and path patterns
//! - [`role`]: the authorization gate and in-handler role checks
//! - [`entry_point`]: `401` / `403` responses
//!
//! # Request Flow
//!
//! 1. `resolve_identity` reads `Authorization: Bearer <token>`, verifies it and,
//!    for access tokens only, stores a `Principal` in the request extensions
//! 2. `authorize` looks up the first matching policy rule for the method and path
//! 3. The request reaches its handler, or is answered with `401` (no identity)
//!    or `403` (identity without a required role)
//!
//! Token failures never surface as errors at this stage; they only make the
//! request anonymous.

pub mod auth;
pub mod entry_point;
pub mod policy;
pub mod role;
