/*!
 * Repository layer for the vocabulary store.
 *
 * Reads the series, subtitles and keyword annotations a burn job is built
 * from, resolves corpus ranks from `t_coca`, and records burned outputs.
 */

use anyhow::{anyhow, Result};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::connection::DatabaseConnection;
use super::models::{KeywordRecord, SeriesRecord, SubtitleRecord};
use crate::burn_job::AnnotatedUtterance;
use crate::frequency::{resolve_rank, FrequencyLookup};
use crate::models::{Utterance, VocabAnnotation};

/// Repository for store operations
#[derive(Debug, Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new(path)?))
    }

    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory store (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Series
    // =========================================================================

    pub async fn create_series(&self, series: &SeriesRecord) -> Result<i64> {
        let series = series.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO t_series (name, file_path, file_type, duration, new_name, new_file_path)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        series.name,
                        series.file_path,
                        series.file_type,
                        series.duration,
                        series.new_name,
                        series.new_file_path,
                    ],
                )?;
                let id = conn.last_insert_rowid();
                info!("Created series '{}' (id {})", series.name, id);
                Ok(id)
            })
            .await
    }

    pub async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>> {
        self.db
            .execute_async(move |conn| Self::get_series_sync(conn, series_id))
            .await
    }

    fn get_series_sync(conn: &Connection, series_id: i64) -> Result<Option<SeriesRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT id, name, file_path, file_type, duration, new_name, new_file_path,
                       third_name, third_file_path
                FROM t_series WHERE id = ?1
                "#,
                [series_id],
                |row| {
                    Ok(SeriesRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        file_path: row.get(2)?,
                        file_type: row.get(3)?,
                        duration: row.get(4)?,
                        new_name: row.get(5)?,
                        new_file_path: row.get(6)?,
                        third_name: row.get(7)?,
                        third_file_path: row.get(8)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    /// Store the burned video as the series' third file
    pub async fn record_burn_output(&self, series_id: i64, output: &Path) -> Result<()> {
        let output_path = output.to_string_lossy().to_string();
        let output_name = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| output_path.clone());
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    r#"
                    UPDATE t_series
                    SET third_name = ?1, third_file_path = ?2, updated_at = ?3
                    WHERE id = ?4
                    "#,
                    params![output_name, output_path, now, series_id],
                )?;
                if updated == 0 {
                    return Err(anyhow!("Series {} not found", series_id));
                }
                debug!("Recorded burn output for series {}: {}", series_id, output_path);
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Subtitles and keywords
    // =========================================================================

    pub async fn create_subtitle(&self, subtitle: &SubtitleRecord) -> Result<i64> {
        let subtitle = subtitle.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO t_subtitle (series_id, begin_time, end_time, english_text, chinese_text)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        subtitle.series_id,
                        subtitle.begin_time,
                        subtitle.end_time,
                        subtitle.english_text,
                        subtitle.chinese_text,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    pub async fn create_keyword(&self, keyword: &KeywordRecord) -> Result<i64> {
        let keyword = keyword.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO t_keywords (subtitle_id, key_word, phonetic_symbol, explain_text, coca, is_selected)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        keyword.subtitle_id,
                        keyword.key_word,
                        keyword.phonetic_symbol,
                        keyword.explain_text,
                        keyword.coca,
                        keyword.is_selected as i64,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Utterances of a series ordered by start time, each with its subtitle id
    pub async fn get_utterances(&self, series_id: i64) -> Result<Vec<(i64, Utterance)>> {
        self.db
            .execute_async(move |conn| {
                Ok(Self::get_subtitles_sync(conn, series_id)?
                    .into_iter()
                    .map(|record| (record.id, record.to_utterance()))
                    .collect())
            })
            .await
    }

    fn get_subtitles_sync(conn: &Connection, series_id: i64) -> Result<Vec<SubtitleRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, series_id, begin_time, end_time, english_text, chinese_text
            FROM t_subtitle WHERE series_id = ?1
            ORDER BY begin_time, id
            "#,
        )?;

        let records = stmt
            .query_map([series_id], |row| {
                Ok(SubtitleRecord {
                    id: row.get(0)?,
                    series_id: row.get(1)?,
                    begin_time: row.get(2)?,
                    end_time: row.get(3)?,
                    english_text: row.get(4)?,
                    chinese_text: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub async fn get_annotations(&self, subtitle_id: i64) -> Result<Vec<VocabAnnotation>> {
        self.db
            .execute_async(move |conn| {
                Ok(Self::get_keywords_sync(conn, subtitle_id)?
                    .iter()
                    .map(KeywordRecord::to_annotation)
                    .collect())
            })
            .await
    }

    fn get_keywords_sync(conn: &Connection, subtitle_id: i64) -> Result<Vec<KeywordRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, subtitle_id, key_word, phonetic_symbol, explain_text, coca, is_selected
            FROM t_keywords WHERE subtitle_id = ?1
            ORDER BY id
            "#,
        )?;

        let records = stmt
            .query_map([subtitle_id], |row| {
                Ok(KeywordRecord {
                    id: row.get(0)?,
                    subtitle_id: row.get(1)?,
                    key_word: row.get(2)?,
                    phonetic_symbol: row.get(3)?,
                    explain_text: row.get(4)?,
                    coca: row.get(5)?,
                    is_selected: row.get::<_, Option<i64>>(6)?.unwrap_or(0) != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn annotated_utterances_sync(conn: &Connection, series_id: i64) -> Result<Vec<AnnotatedUtterance>> {
        let mut utterances = Vec::new();
        for subtitle in Self::get_subtitles_sync(conn, series_id)? {
            let annotations = Self::get_keywords_sync(conn, subtitle.id)?
                .iter()
                .map(KeywordRecord::to_annotation)
                .collect();
            utterances.push(AnnotatedUtterance::new(subtitle.to_utterance(), annotations));
        }
        Ok(utterances)
    }

    /// Every utterance of a series with its annotations, in one blocking call
    pub async fn annotated_utterances(&self, series_id: i64) -> Result<Vec<AnnotatedUtterance>> {
        self.db
            .execute_async(move |conn| Self::annotated_utterances_sync(conn, series_id))
            .await
    }

    /// Like [`Self::annotated_utterances`], with unset ranks resolved from `t_coca`
    /// in the same blocking call
    pub async fn ranked_utterances(&self, series_id: i64) -> Result<Vec<AnnotatedUtterance>> {
        self.db
            .execute_async(move |conn| {
                let mut utterances = Self::annotated_utterances_sync(conn, series_id)?;
                let unranked = utterances
                    .iter_mut()
                    .flat_map(|entry| entry.annotations.iter_mut())
                    .filter(|a| a.frequency_rank.is_none());
                for annotation in unranked {
                    annotation.frequency_rank = resolve_rank(&annotation.word, |w| Self::exact_rank(conn, w));
                    if annotation.frequency_rank.is_none() {
                        debug!("No frequency rank for '{}'", annotation.word);
                    }
                }
                Ok(utterances)
            })
            .await
    }

    // =========================================================================
    // Frequency list
    // =========================================================================

    pub async fn insert_frequency(&self, word: &str, rank: u32) -> Result<()> {
        let word = word.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT INTO t_coca (word, rank) VALUES (?1, ?2)",
                    params![word, rank],
                )?;
                Ok(())
            })
            .await
    }

    fn exact_rank(conn: &Connection, word: &str) -> Option<u32> {
        conn.query_row(
            "SELECT rank FROM t_coca WHERE LOWER(word) = LOWER(?1) LIMIT 1",
            [word],
            |row| row.get::<_, u32>(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            debug!("Frequency lookup for '{}' failed: {}", word, e);
            None
        })
    }

    /// Corpus rank of `word`, with phrase and root fallbacks
    pub fn frequency_rank(&self, word: &str) -> Result<Option<u32>> {
        self.db
            .execute(|conn| Ok(resolve_rank(word, |w| Self::exact_rank(conn, w))))
    }
}

impl FrequencyLookup for Repository {
    fn rank(&self, word: &str) -> Option<u32> {
        self.frequency_rank(word).unwrap_or_else(|e| {
            debug!("Frequency store unavailable: {}", e);
            None
        })
    }
}
