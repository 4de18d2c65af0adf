mod models;
mod store;

pub use store::SqliteTeamStore;

use crate::error::Result;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

/// Initialize the team database and run migrations.
pub async fn init_team_db(db_path: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_path)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("team DB initialized: {}", db_path);

    Ok(pool)
}
