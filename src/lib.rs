//! # Rihua API
//!
//! Stateless token authentication and request authorization for the Rihua
//! community platform.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── rihua-core/           # AppError, ErrorResponse, password hashing
//! ├── rihua-config/         # JwtConfig, ServerConfig (environment)
//! ├── rihua-auth/           # token codec, issuer, validator, roles, principal
//! └── rihua-observability/  # tracing setup, request logging, metrics
//! src/
//! ├── middleware/           # identity resolver, policy table, gate, 401/403
//! ├── modules/
//! │   ├── auth/            # login and refresh
//! │   ├── users/           # current user, credential store
//! │   └── health/          # /actuator endpoints
//! └── bin/cli.rs            # rihua-cli
//! ```
//!
//! Each feature module follows the same layout: `controller.rs` (handlers),
//! `service.rs` (logic), `model.rs` (DTOs) and `router.rs`.
//!
//! ## Request Pipeline
//!
//! ```text
//! request ─► resolve_identity ─► authorize ─► handler
//!                │                   │
//!                │                   ├─► 401 + WWW-Authenticate (no identity)
//!                │                   └─► 403 (identity lacks role)
//!                └─► RequestIdentity in request extensions
//! ```
//!
//! Token problems (bad signature, expiry, refresh token used as access token)
//! never fail a request by themselves; they make it anonymous and the route
//! policy decides.
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=at-least-32-bytes-of-random-secret
//! JWT_ACCESS_EXPIRY=3600
//! JWT_REFRESH_EXPIRY=2592000
//! HOST=0.0.0.0
//! PORT=3000
//! AUTH_REALM="Rihua API"
//! DEFAULT_LANGUAGE=zh-CN
//! SEED_USERS_FILE=./users.json
//! LOG_DIR=storage/logs
//! ```
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use rihua_auth;
pub use rihua_config;
pub use rihua_core;
pub use rihua_observability;
