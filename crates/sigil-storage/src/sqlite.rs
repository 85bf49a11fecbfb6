use async_trait::async_trait;
use jiff::Timestamp;
use sigil_core::error::{Result, StorageError};
use sigil_core::repository::{Repository, UrlRecord};
use sqlx::{Row, SqlitePool};

/// SQLite implementation of the repository contract.
///
/// A single `urls` table with an autoincrement primary key and a unique
/// `long_url` column. The short token is never stored; it is recomputed
/// from the row id, so it cannot drift from the encoding rule.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    ///
    /// The caller is responsible for running [`ensure_schema`][Self::ensure_schema].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new SQLite connection pool and
    /// applying the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        let repository = Self::new(pool);
        repository.ensure_schema().await?;
        Ok(repository)
    }

    /// Applies the schema if it is not present yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                long_url TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_by_url(&self, long_url: &str) -> Result<Option<u64>> {
        let row = sqlx::query("SELECT id FROM urls WHERE long_url = ? LIMIT 1")
            .bind(long_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| {
            let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
            row_id(id)
        })
        .transpose()
    }
}

fn row_id(id: i64) -> Result<u64> {
    u64::try_from(id)
        .map_err(|_| StorageError::InvalidData(format!("negative row id '{id}'")))
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{seconds}': {e}"))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert_or_get(&self, long_url: &str) -> Result<u64> {
        if let Some(id) = self.find_by_url(long_url).await? {
            return Ok(id);
        }

        let inserted = sqlx::query("INSERT INTO urls (long_url, created_at) VALUES (?, ?)")
            .bind(long_url)
            .bind(Timestamp::now().as_second())
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(result) => row_id(result.last_insert_rowid()),
            // Lost the race against a concurrent insert of the same URL;
            // the unique index guarantees the row now exists.
            Err(err) if is_unique_violation(&err) => {
                self.find_by_url(long_url).await?.ok_or_else(|| {
                    StorageError::Operation(format!(
                        "url vanished after unique violation: {long_url}"
                    ))
                })
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, id: u64) -> Result<Option<UrlRecord>> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT long_url, created_at FROM urls WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let created_at = parse_created_at(created_at_raw)?;

        Ok(Some(UrlRecord {
            long_url,
            created_at,
        }))
    }
}
