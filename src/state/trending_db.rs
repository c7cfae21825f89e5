use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqlResult};
use std::path::{Path, PathBuf};

use super::data::{Movie, TrendingEntry};
use crate::api::TrendingStore;
use crate::error::{Error, Result};

/// Local trending store backed by a SQLite database.
/// Used when no hosted store is configured.
///
/// rusqlite::Connection is not Send, so the store only keeps the database
/// path and every operation opens its own connection on a blocking thread.
pub struct TrendingDb {
    db_path: PathBuf,
}

impl TrendingDb {
    /// Open (or create) the store and initialize its schema.
    ///
    /// Without an explicit path the database file lives in the user's data directory:
    /// - Linux: ~/.local/share/movie-finder/movie_finder.db
    /// - macOS: ~/Library/Application Support/movie-finder/movie_finder.db
    /// - Windows: %APPDATA%\movie-finder\movie_finder.db
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let db_path = match path {
            Some(path) => path,
            None => Self::default_db_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;

        Ok(TrendingDb { db_path })
    }

    fn default_db_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| Error::Config("could not determine user data directory".into()))?;

        path.push("movie-finder");
        path.push("movie_finder.db");
        Ok(path)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` against a fresh connection off the async executor
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> SqlResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let value = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            f(&conn)
        })
        .await??;
        Ok(value)
    }
}

/// Create tables and indexes if they don't exist.
fn init_schema(conn: &Connection) -> SqlResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS searches (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            search_term     TEXT NOT NULL UNIQUE,
            count           INTEGER NOT NULL DEFAULT 1,
            movie_id        INTEGER NOT NULL,
            poster_url      TEXT NOT NULL,
            created_at      INTEGER NOT NULL,
            updated_at      INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_searches_count
         ON searches(count DESC)",
        [],
    )?;

    Ok(())
}

fn record(conn: &Connection, term: &str, movie_id: i64, poster_url: &str) -> SqlResult<()> {
    let now = Utc::now().timestamp();

    // The first poster recorded for a term sticks
    conn.execute(
        "INSERT INTO searches (search_term, count, movie_id, poster_url, created_at, updated_at)
         VALUES (?1, 1, ?2, ?3, ?4, ?4)
         ON CONFLICT(search_term) DO UPDATE SET
            count = count + 1,
            updated_at = excluded.updated_at",
        params![term, movie_id, poster_url, now],
    )?;
    Ok(())
}

fn top(conn: &Connection, limit: usize) -> SqlResult<Vec<TrendingEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, search_term, count, movie_id, poster_url
         FROM searches
         ORDER BY count DESC, id ASC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit as i64], |row| {
        Ok(TrendingEntry {
            id: row.get::<_, i64>(0)?.to_string(),
            search_term: row.get(1)?,
            count: row.get(2)?,
            movie_id: row.get(3)?,
            poster_url: row.get(4)?,
        })
    })?;

    rows.collect()
}

#[async_trait]
impl TrendingStore for TrendingDb {
    async fn top(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        self.with_conn(move |conn| top(conn, limit)).await
    }

    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
        let term = term.to_string();
        let movie_id = movie.id;
        let poster_url = movie.poster_url().unwrap_or_default();

        self.with_conn(move |conn| record(conn, &term, movie_id, &poster_url))
            .await
    }
}

impl std::fmt::Debug for TrendingDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendingDb")
            .field("db_path", &self.db_path)
            .finish()
    }
}
