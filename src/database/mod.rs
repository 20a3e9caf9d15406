/*!
 * SQLite-backed vocabulary store.
 *
 * The store is filled by the transcription and vocabulary tools:
 * - `t_series`: source videos and their derived files
 * - `t_subtitle`: timed bilingual lines of a series
 * - `t_keywords`: vocabulary annotations of a line
 * - `t_coca`: corpus frequency ranks
 */

// Allow dead code - store types are for library consumers
#![allow(dead_code)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::{DatabaseConnection, StoreStats};
pub use models::{KeywordRecord, SeriesRecord, SubtitleRecord};
pub use repository::Repository;
