//! Shared application state: the three platform handles plus settings.

use crate::config::Settings;
use crate::error::AppError;
use crate::platform::{GoTrueClient, IdentityProvider, ObjectStorage, S3Storage};
use crate::store::{ensure_database_exists, ensure_schema, MarketStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MarketStore>,
        identity: Arc<dyn IdentityProvider>,
        storage: Arc<dyn ObjectStorage>,
        settings: Settings,
    ) -> Self {
        AppState {
            store,
            identity,
            storage,
            settings: Arc::new(settings),
        }
    }

    /// Build every platform client once. With `ENSURE_SCHEMA` set, also bootstrap the
    /// database and tables for local development.
    pub async fn connect(settings: Settings) -> Result<Self, AppError> {
        if settings.database.ensure_schema {
            ensure_database_exists(&settings.database.url).await?;
        }
        let pool = PgPoolOptions::new()
            .max_connections(settings.database.max_connections)
            .connect(&settings.database.url)
            .await?;
        if settings.database.ensure_schema {
            ensure_schema(&pool).await?;
        }
        tracing::info!(max_connections = settings.database.max_connections, "database pool ready");

        let identity = GoTrueClient::new(&settings.identity)?;
        let storage = S3Storage::connect(&settings.storage).await;
        Ok(AppState::new(
            Arc::new(PgStore::new(pool)),
            Arc::new(identity),
            Arc::new(storage),
            settings,
        ))
    }
}
