use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

/// Open the database named by `config` and bring its schema up to date.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    tracing::info!(
        "Connecting to database: {}",
        if config.is_sqlite() { "SQLite (local)" } else { "PostgreSQL" }
    );

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
