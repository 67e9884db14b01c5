pub mod error;
pub mod movie;
pub mod runtime;

use std::{str::FromStr as _, time::Duration};

pub use error::Error;
use greenlight_types::config::DatabaseConfig;
use sqlx::{
    Connection as _,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

/// Creates the connection pool and checks the database answers within
/// `db_connect_timeout`. The pool is closed again if it does not.
pub async fn new_pool(config: &DatabaseConfig) -> Result<Pool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(config.db_idle_timeout)
        .acquire_timeout(config.db_connect_timeout)
        .connect_lazy_with(options);

    if let Err(e) = ping(&pool, config.db_connect_timeout).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

pub async fn ping(pool: &Pool, timeout: Duration) -> Result<()> {
    let check = async {
        let mut conn = pool.acquire().await?;
        conn.ping().await
    };
    match tokio::time::timeout(timeout, check).await {
        Ok(res) => {
            res?;
            debug!("Database ping ok");
            Ok(())
        }
        Err(_) => Err(Error::ConnectTimeout(timeout)),
    }
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
