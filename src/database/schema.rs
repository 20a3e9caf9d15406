/*!
 * Database schema definitions and migrations.
 *
 * The store is shared with the ingestion tools, which may have created the
 * tables before any column added later existed. Missing columns are added
 * in place; nothing is ever dropped.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Columns older ingestion tools may not have created, as (table, column, type)
const ADDED_COLUMNS: [(&str, &str, &str); 13] = [
    ("t_series", "file_type", "TEXT"),
    ("t_series", "duration", "REAL"),
    ("t_series", "updated_at", "TEXT"),
    ("t_series", "new_name", "TEXT"),
    ("t_series", "new_file_path", "TEXT"),
    ("t_series", "second_name", "TEXT"),
    ("t_series", "second_file_path", "TEXT"),
    ("t_series", "third_name", "TEXT"),
    ("t_series", "third_file_path", "TEXT"),
    ("t_keywords", "phonetic_symbol", "TEXT"),
    ("t_keywords", "explain_text", "TEXT"),
    ("t_keywords", "coca", "INTEGER"),
    ("t_keywords", "is_selected", "INTEGER DEFAULT 0"),
];

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        migrate_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables with their first-release columns
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Media series
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS t_series (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            file_path TEXT,
            file_type TEXT,
            duration REAL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )?;

    // Timed subtitles of a series
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS t_subtitle (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            series_id INTEGER NOT NULL,
            begin_time REAL NOT NULL,
            end_time REAL NOT NULL,
            english_text TEXT,
            chinese_text TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (series_id) REFERENCES t_series (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_subtitle_series_id ON t_subtitle(series_id);
        CREATE INDEX IF NOT EXISTS idx_subtitle_time ON t_subtitle(begin_time, end_time);
        "#,
    )?;

    // Vocabulary annotations of a subtitle
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS t_keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subtitle_id INTEGER NOT NULL,
            key_word TEXT NOT NULL,
            phonetic_symbol TEXT,
            explain_text TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (subtitle_id) REFERENCES t_subtitle (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_keywords_subtitle_id ON t_keywords(subtitle_id);
        CREATE INDEX IF NOT EXISTS idx_keywords_word ON t_keywords(key_word);
        "#,
    )?;

    // Corpus frequency list
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS t_coca (
            word TEXT NOT NULL,
            rank INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_coca_word ON t_coca(word);
        "#,
    )?;

    Ok(())
}

/// Column names of `table`
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Add every column introduced after the first release that is missing
fn migrate_schema(conn: &Connection) -> Result<()> {
    for (table, column, column_type) in ADDED_COLUMNS {
        let columns = table_columns(conn, table)?;
        if columns.iter().any(|c| c == column) {
            continue;
        }

        conn.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {};",
            table, column, column_type
        ))
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
        info!("Added column {} to {}", column, table);
    }

    Ok(())
}
