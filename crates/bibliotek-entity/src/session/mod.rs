//! Session entities.

pub mod model;

pub use model::{CreateSession, Session, SessionSummary};
