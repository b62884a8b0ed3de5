use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct ConnectionPool {
    pool: SqlitePool,
}

impl ConnectionPool {
    /// Opens (creating if missing) the database and applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::StorageUnavailable(format!("invalid database url: {e}")))?
            .create_if_missing(true);
        if !config.is_in_memory() {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.effective_max_connections())
            .acquire_timeout(Duration::from_secs(config.connection_timeout.max(1)));
        if config.is_in_memory() {
            // dropping the only connection would discard the database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        let pool = Self { pool };
        pool.migrate().await?;

        tracing::info!(
            target: "offline::store",
            url = %config.url,
            max_connections = config.effective_max_connections(),
            "offline store opened"
        );

        Ok(pool)
    }

    pub async fn from_memory() -> Result<Self, AppError> {
        Self::open(&DatabaseConfig::in_memory()).await
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
