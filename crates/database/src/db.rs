use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::{env, time::Duration};

/// Creates a connection pool from the `DATABASE_URL` environment variable,
/// reading a `.env` file first when one exists
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    dotenvy::dotenv().ok();

    let url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;

    connect(&url).await
}

/// Creates a connection pool for the given database url
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // Every connection to an in-memory SQLite database sees its own database
    if url.starts_with("sqlite::memory:") {
        options.max_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Connected to database");

    Ok(db)
}
