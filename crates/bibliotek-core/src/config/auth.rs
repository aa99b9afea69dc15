//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT signing algorithm: `"HS256"`, `"HS384"`, or `"HS512"`.
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in hours.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_hours: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_days: u64,
    /// Clock skew leeway for token expiry checks, in seconds.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 parallelism degree.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Failed login attempts at which the account locks.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i32,
    /// Whether revocation checks run on every authenticated request.
    #[serde(default = "default_true")]
    pub revocation_check_enabled: bool,
    /// Interval between maintenance sweeps, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    24
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_leeway() -> u64 {
    30
}

fn default_password_min() -> usize {
    6
}

fn default_argon2_memory() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

fn default_max_failed() -> i32 {
    4
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}
