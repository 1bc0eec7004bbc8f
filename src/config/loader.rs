//! Load [`Settings`] from the process environment (after `.env`).

use super::types::{
    DatabaseSettings, IdentitySettings, Settings, StorageSettings, DEFAULT_CORS_ORIGINS,
    MAX_SIGNED_URL_TTL,
};
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

impl Settings {
    /// Reads `.env` if present, then the environment. Fails on the first missing required key.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let anon_key = required("SUPABASE_KEY")?;
        let service_role_key = required("SUPABASE_SERVICE_ROLE_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), "0.0.0.0:3001")?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), "5")?;
        let ensure_schema = parse_or("ENSURE_SCHEMA", get("ENSURE_SCHEMA"), "false")?;
        let connect_timeout: u64 =
            parse_or("HTTP_CONNECT_TIMEOUT_SECS", get("HTTP_CONNECT_TIMEOUT_SECS"), "10")?;
        let ttl_secs: u64 = parse_or(
            "SIGNED_URL_TTL_SECS",
            get("SIGNED_URL_TTL_SECS"),
            &MAX_SIGNED_URL_TTL.as_secs().to_string(),
        )?;
        let signed_url_ttl = Duration::from_secs(ttl_secs).min(MAX_SIGNED_URL_TTL);
        if ttl_secs > MAX_SIGNED_URL_TTL.as_secs() {
            tracing::warn!(
                requested = ttl_secs,
                max = MAX_SIGNED_URL_TTL.as_secs(),
                "SIGNED_URL_TTL_SECS above presign limit, capping"
            );
        }

        let cors_origins = match get("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Settings {
            bind_addr,
            database: DatabaseSettings {
                url: database_url,
                max_connections,
                ensure_schema,
            },
            identity: IdentitySettings {
                base_url: supabase_url.clone(),
                anon_key,
                service_role_key,
                connect_timeout: Duration::from_secs(connect_timeout),
            },
            storage: StorageSettings {
                s3_endpoint: get("STORAGE_S3_ENDPOINT")
                    .unwrap_or_else(|| format!("{}/storage/v1/s3", supabase_url)),
                region: get("STORAGE_S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                access_key_id: required("STORAGE_ACCESS_KEY_ID")?,
                secret_access_key: required("STORAGE_SECRET_ACCESS_KEY")?,
                public_url: get("STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|| format!("{}/storage/v1/object/public", supabase_url))
                    .trim_end_matches('/')
                    .to_string(),
                signed_url_ttl,
            },
            cors_origins,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
