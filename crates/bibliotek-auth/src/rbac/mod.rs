//! Role-based authorization policy.

pub mod policy;

pub use policy::{AuthorizationPolicy, ResourceAccess, ResourceKind};
