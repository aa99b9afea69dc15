//! Per-device session lifecycle.

pub mod cleanup;
pub mod manager;

pub use cleanup::MaintenanceSweep;
pub use manager::SessionManager;
