use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Connect options for an existing database file. Foreign keys are always on,
/// otherwise `employees.department_id` would not be checked at all.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?.foreign_keys(true))
}

/// Opens the web pool, creating the file and schema when missing.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = connect_options(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(database_url, "Database ready");

    Ok(pool)
}
