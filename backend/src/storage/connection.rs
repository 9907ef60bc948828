use anyhow::Result;
use sqlx::{
    migrate::MigrateDatabase,
    pool::PoolConnection,
    sqlite::SqlitePoolOptions,
    Sqlite, SqlitePool,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// DbConnection owns the pool backing the account document store
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect to the store and make sure the account collection and its
    /// index exist. Any failure here is a startup failure.
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    /// Open a private in-memory store.
    ///
    /// The pool is pinned to a single connection that never expires, so every
    /// operation sees the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check a connection out of the pool for the duration of one operation.
    /// The connection goes back to the pool when the guard is dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Set up the account collection.
    ///
    /// Each account is one JSON document. `account_id` is copied out of the
    /// document into its own column so it can carry a unique index. The index
    /// is partial (sparse): documents without an id are not indexed.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id TEXT,
                document TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_account_id
            ON accounts(account_id)
            WHERE account_id IS NOT NULL;
            "#,
        )
        .execute(pool)
        .await?;

        info!("Ensured unique index on accounts.account_id");
        Ok(())
    }
}
