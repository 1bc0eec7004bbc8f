//! Point every product's `image_url` at the public URL of its stored image.
//! Keys without a numeric product id are skipped.

use tarladan_api::platform::S3Storage;
use tarladan_api::service::ProductService;
use tarladan_api::store::PgStore;
use tarladan_api::Settings;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tarladan_api=info")))
        .init();

    let settings = Settings::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;
    let store = PgStore::new(pool);
    let storage = S3Storage::connect(&settings.storage).await;

    let report = ProductService::relink_images(&store, &storage).await?;
    println!(
        "updated: {}, skipped: {}, errors: {}",
        report.updated, report.skipped, report.errors
    );
    if report.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
