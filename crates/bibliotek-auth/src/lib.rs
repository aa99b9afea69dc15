//! # bibliotek-auth
//!
//! Authentication, authorization, and session management for Bibliotek.
//!
//! ## Modules
//!
//! - `jwt`: JWT token issuance, verification, and tolerant decoding
//! - `password`: Argon2id password hashing with a configurable work factor
//! - `credentials`: credential validation with progressive lockout
//! - `revocation`: storage-backed access-token denylist
//! - `session`: per-device session lifecycle and maintenance sweep
//! - `rbac`: role and resource-ownership authorization policy
//! - `rate_limit`: per-account sliding-window request counting

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod rate_limit;
pub mod rbac;
pub mod revocation;
pub mod session;

pub use credentials::CredentialService;
pub use jwt::{AccessClaims, RefreshClaims, TokenIssuer, TokenVerifier};
pub use password::PasswordHasher;
pub use rate_limit::{InMemoryCounter, RequestCounter};
pub use rbac::{AuthorizationPolicy, ResourceKind};
pub use revocation::RevocationRegistry;
pub use session::{MaintenanceSweep, SessionManager};
