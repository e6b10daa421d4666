//! Local cache of an author's repos and followers count.
//!
//! Implements `CacheRepository` on top of SQLite via `rusqlite`. Queries run
//! on Tokio's blocking pool so callers never stall the async executor.
//! Every successful write bumps a change counter that readers can watch.

use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};
use tokio::sync::watch;

use crate::database::connection::Database;
use crate::types::errors::CacheError;
use crate::types::repo::Repo;

/// Trait defining local cache operations, keyed by author id.
pub trait CacheRepository: Send + Sync + 'static {
    /// Replaces every cached repo of `author_id` with `repos`, keeping their order.
    fn insert_repos(
        &self,
        repos: &[Repo],
        author_id: &str,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn update_followers_count(
        &self,
        count: u32,
        author_id: &str,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn get_repos_by_author_id(
        &self,
        author_id: &str,
    ) -> impl Future<Output = Result<Vec<Repo>, CacheError>> + Send;

    /// Returns 0 when nothing was cached for `author_id`.
    fn get_followers_count_by_author_id(
        &self,
        author_id: &str,
    ) -> impl Future<Output = Result<u32, CacheError>> + Send;

    /// Change notifications: the value is a write counter, bumped after
    /// every successful write for any author.
    fn subscribe_changes(&self) -> watch::Receiver<u64>;
}

/// Cache repository backed by a shared SQLite database.
pub struct SqliteCacheRepository {
    db: Arc<Database>,
    changes: watch::Sender<u64>,
}

impl SqliteCacheRepository {
    pub fn new(db: Arc<Database>) -> Self {
        let (changes, _) = watch::channel(0);
        Self { db, changes }
    }

    fn notify_changed(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Runs `query` against the locked connection on the blocking pool.
    async fn run_blocking<T, F>(&self, query: F) -> Result<T, CacheError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.connection();
            query(&conn)
        })
        .await
        .map_err(|e| CacheError::TaskFailed(e.to_string()))?
        .map_err(|e| CacheError::DatabaseError(e.to_string()))
    }

    fn row_to_repo(row: &rusqlite::Row) -> rusqlite::Result<Repo> {
        Ok(Repo {
            name: row.get(0)?,
            description: row.get(1)?,
            html_url: row.get(2)?,
        })
    }
}

impl CacheRepository for SqliteCacheRepository {
    async fn insert_repos(&self, repos: &[Repo], author_id: &str) -> Result<(), CacheError> {
        let repos = repos.to_vec();
        let author_id = author_id.to_string();
        self.run_blocking(move |conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "DELETE FROM cached_repos WHERE author_id = ?1",
                params![author_id],
            )?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO cached_repos (author_id, position, name, description, html_url) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for (position, repo) in repos.iter().enumerate() {
                    stmt.execute(params![
                        author_id,
                        position as i64,
                        repo.name,
                        repo.description,
                        repo.html_url
                    ])?;
                }
            }
            tx.commit()
        })
        .await?;
        self.notify_changed();
        Ok(())
    }

    async fn update_followers_count(&self, count: u32, author_id: &str) -> Result<(), CacheError> {
        let author_id = author_id.to_string();
        let now = Self::now();
        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT INTO author_followers (author_id, followers_qty, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(author_id) DO UPDATE SET followers_qty = excluded.followers_qty, \
                 updated_at = excluded.updated_at",
                params![author_id, count, now],
            )
            .map(|_| ())
        })
        .await?;
        self.notify_changed();
        Ok(())
    }

    async fn get_repos_by_author_id(&self, author_id: &str) -> Result<Vec<Repo>, CacheError> {
        let author_id = author_id.to_string();
        self.run_blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT name, description, html_url FROM cached_repos \
                 WHERE author_id = ?1 ORDER BY position ASC",
            )?;
            let rows = stmt.query_map(params![author_id], Self::row_to_repo)?;
            rows.collect()
        })
        .await
    }

    async fn get_followers_count_by_author_id(&self, author_id: &str) -> Result<u32, CacheError> {
        let author_id = author_id.to_string();
        self.run_blocking(move |conn| {
            match conn.query_row(
                "SELECT followers_qty FROM author_followers WHERE author_id = ?1",
                params![author_id],
                |row| row.get(0),
            ) {
                Ok(count) => Ok(count),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
                Err(e) => Err(e),
            }
        })
        .await
    }

    fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
