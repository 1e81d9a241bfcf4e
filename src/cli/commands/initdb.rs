use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info, trace};

/// Apply every pending migration to an already-open connection.
pub(crate) async fn apply_migrations(db: &DatabaseConnection) -> Result<()> {
    info!("Running database migrations");
    Migrator::up(db, None)
        .await
        .context("Failed to run database migrations")?;
    debug!("All pending migrations have been applied");
    Ok(())
}

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    info!("Successfully connected to database");

    apply_migrations(&db).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
