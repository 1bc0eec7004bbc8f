//! DDL for the marketplace tables and database bootstrap. In production the hosted
//! platform owns these tables; this only runs when `ENSURE_SCHEMA` is set.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const TABLES: &[(&str, &str)] = &[
    (
        "farmer",
        r#"
        CREATE TABLE IF NOT EXISTS farmer (
            farmer_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            auth_id UUID NOT NULL UNIQUE,
            farmer_name TEXT NOT NULL,
            farmer_last_name TEXT NOT NULL,
            farmer_age INTEGER NOT NULL,
            farmer_address TEXT NOT NULL,
            farmer_city TEXT NOT NULL,
            farmer_town TEXT NOT NULL,
            farmer_neighbourhood TEXT NOT NULL,
            farmer_phone_number TEXT NOT NULL,
            farmer_mail TEXT NOT NULL,
            farmer_activity_status TEXT NOT NULL DEFAULT 'NonActive',
            farm_name TEXT NOT NULL,
            farmer_tc_no TEXT NOT NULL,
            imgurl TEXT,
            farmer_biografi TEXT,
            store_activity TEXT NOT NULL DEFAULT 'nonactive',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            farmer_id BIGINT NOT NULL,
            product_name TEXT NOT NULL,
            product_katalog_name TEXT NOT NULL,
            farmer_price NUMERIC(10, 2) NOT NULL,
            tarladan_commission NUMERIC(10, 2) NOT NULL,
            tarladan_price NUMERIC(10, 2) NOT NULL,
            stock_quantity INTEGER NOT NULL DEFAULT 0,
            image_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "order_product",
        r#"
        CREATE TABLE IF NOT EXISTS order_product (
            order_product_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            order_id BIGINT NOT NULL,
            product_id BIGINT NOT NULL,
            farmer_id BIGINT NOT NULL,
            farmer_name TEXT NOT NULL,
            unit_quantity INTEGER NOT NULL,
            unit_price NUMERIC(10, 2) NOT NULL,
            total_product_price NUMERIC(10, 2) NOT NULL,
            order_product_rate INTEGER,
            delivery_address_id BIGINT,
            product_name TEXT NOT NULL,
            order_product_status TEXT NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "farmer_images",
        r#"
        CREATE TABLE IF NOT EXISTS farmer_images (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            farmer_id BIGINT NOT NULL,
            file_path TEXT NOT NULL,
            image_url TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "farmer_certificate",
        r#"
        CREATE TABLE IF NOT EXISTS farmer_certificate (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            farmer_id BIGINT NOT NULL,
            file_path TEXT NOT NULL,
            certificate_url TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "farmer_product_income",
        r#"
        CREATE TABLE IF NOT EXISTS farmer_product_income (
            income_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            order_prduct_id BIGINT NOT NULL,
            product_id BIGINT NOT NULL,
            farmer_id BIGINT NOT NULL,
            farmer_name TEXT NOT NULL,
            product_name TEXT NOT NULL,
            product_quantity INTEGER NOT NULL,
            product_income NUMERIC(10, 2) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS products_farmer_id_idx ON products (farmer_id)",
    "CREATE INDEX IF NOT EXISTS order_product_farmer_id_idx ON order_product (farmer_id)",
    "CREATE INDEX IF NOT EXISTS farmer_images_farmer_id_idx ON farmer_images (farmer_id)",
    "CREATE INDEX IF NOT EXISTS farmer_certificate_farmer_id_idx ON farmer_certificate (farmer_id)",
    "CREATE INDEX IF NOT EXISTS farmer_product_income_farmer_id_idx ON farmer_product_income (farmer_id)",
];

/// Create the marketplace tables and their farmer indexes when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for (name, ddl) in TABLES {
        tracing::debug!(table = %name, "ensure table");
        sqlx::query(ddl).execute(pool).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(tables = TABLES.len(), "schema ensured");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
