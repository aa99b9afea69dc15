//! Shared domain-independent types.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
