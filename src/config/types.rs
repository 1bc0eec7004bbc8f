//! Runtime settings resolved once at startup.

use std::net::SocketAddr;
use std::time::Duration;

/// Longest lifetime a SigV4 presigned URL may have.
pub const MAX_SIGNED_URL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3002",
    "https://tarladan.app",
    "https://www.tarladan.app",
    "https://api.tarladan.app",
];

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub storage: StorageSettings,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    /// Create the marketplace tables when missing. Local development only.
    pub ensure_schema: bool,
}

/// Hosted auth endpoint plus the two keys: anon for user flows, service role for admin calls.
#[derive(Clone, Debug)]
pub struct IdentitySettings {
    pub base_url: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub connect_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub s3_endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Prefix for public object URLs; the bucket and key are appended.
    pub public_url: String,
    pub signed_url_ttl: Duration,
}
