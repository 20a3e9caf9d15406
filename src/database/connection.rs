/*!
 * SQLite connection handle.
 *
 * One connection is shared behind a mutex; async callers reach it through
 * `spawn_blocking` so queries never stall the runtime.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema;

const DEFAULT_DB_FILENAME: &str = "vocabcut.db";

const IN_MEMORY_PATH: &str = ":memory:";

/// Directory under the user's data directory holding the default store
const DEFAULT_DB_DIRNAME: &str = "vocabcut";

/// Shared, lockable connection to the store
#[derive(Clone)]
pub struct DatabaseConnection {
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("db_path", &self.db_path)
            .finish()
    }
}

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    connection
        .lock()
        .map_err(|e| anyhow!("Vocabulary store lock poisoned: {}", e))
}

impl DatabaseConnection {
    fn from_open(db_path: PathBuf, conn: Connection) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store at the default location
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the store at `db_path` and bring its schema up to date
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create store directory {:?}", parent))?;
        }

        info!("Opening vocabulary store {:?}", db_path);
        let conn = Connection::open(db_path)
            .with_context(|| format!("Cannot open vocabulary store {:?}", db_path))?;

        Self::from_open(db_path.to_path_buf(), conn)
    }

    /// Throwaway store living only as long as the handle
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory vocabulary store");
        let conn = Connection::open_in_memory().context("Cannot open in-memory vocabulary store")?;
        Self::from_open(PathBuf::from(IN_MEMORY_PATH), conn)
    }

    /// `<data dir>/vocabcut/vocabcut.db`
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("No data directory available for the vocabulary store"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` with the locked connection on the current thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.connection)?;
        f(&conn)
    }

    /// Run `f` with the locked connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.connection);

        tokio::task::spawn_blocking(move || {
            let conn = lock(&shared)?;
            f(&conn)
        })
        .await
        .context("Vocabulary store task panicked")?
    }

    /// Run `f` inside a transaction, committing when it succeeds
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T>,
    {
        let mut conn = lock(&self.connection)?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Row counts of the store's tables
    pub fn stats(&self) -> Result<StoreStats> {
        self.execute(|conn| {
            let count = |table: &str| -> i64 {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
                    .unwrap_or(0)
            };

            Ok(StoreStats {
                series_count: count("t_series"),
                subtitle_count: count("t_subtitle"),
                keyword_count: count("t_keywords"),
                frequency_count: count("t_coca"),
            })
        })
    }
}

/// Row counts reported by `DatabaseConnection::stats`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub series_count: i64,
    pub subtitle_count: i64,
    pub keyword_count: i64,
    pub frequency_count: i64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Series: {}, Subtitles: {}, Keywords: {}, Frequency words: {}",
            self.series_count, self.subtitle_count, self.keyword_count, self.frequency_count
        )
    }
}
