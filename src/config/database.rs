//! Database configuration for the `SQLite` coupon store.
//!
//! Handles the connection and table creation using `SeaORM`. Tables are generated
//! from the entity definitions with `Schema::create_table_from_entity`, so the
//! schema always matches the Rust structs without hand-written SQL.

use crate::entities::CouponEntity;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/bwadmin.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection to `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the coupon table (and its unique index on `code`) if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut coupon_table = schema.create_table_from_entity(CouponEntity);
    coupon_table.if_not_exists();

    db.execute(builder.build(&coupon_table)).await?;
    info!("Coupon table ready");

    Ok(())
}
