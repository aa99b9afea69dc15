//! Token revocation entities.

pub mod model;

pub use model::RevokedToken;
