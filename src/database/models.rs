/*!
 * Row types of the vocabulary store.
 *
 * These map one-to-one onto `t_series`, `t_subtitle` and `t_keywords` and
 * convert into the pipeline's data model.
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Utterance, VocabAnnotation};

/// A media series (one source video)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub id: i64,
    pub name: String,
    /// Original upload
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub duration: Option<f64>,
    /// Pre-processed 9:16 version
    pub new_name: Option<String>,
    pub new_file_path: Option<String>,
    /// Burned output
    pub third_name: Option<String>,
    pub third_file_path: Option<String>,
}

impl SeriesRecord {
    pub fn new(name: &str, file_path: Option<&str>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            file_path: file_path.map(|p| p.to_string()),
            file_type: None,
            duration: None,
            new_name: None,
            new_file_path: None,
            third_name: None,
            third_file_path: None,
        }
    }

    /// Video to burn: the pre-processed file when it exists, else the original
    pub fn source_media(&self) -> Option<PathBuf> {
        let preprocessed = self
            .new_file_path
            .as_deref()
            .filter(|p| !p.is_empty() && Path::new(p).is_file());

        preprocessed
            .or(self.file_path.as_deref().filter(|p| !p.is_empty()))
            .map(PathBuf::from)
    }
}

/// One timed subtitle line of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleRecord {
    pub id: i64,
    pub series_id: i64,
    pub begin_time: f64,
    pub end_time: f64,
    pub english_text: Option<String>,
    pub chinese_text: Option<String>,
}

impl SubtitleRecord {
    pub fn new(series_id: i64, begin_time: f64, end_time: f64, english: &str, chinese: Option<&str>) -> Self {
        Self {
            id: 0,
            series_id,
            begin_time,
            end_time,
            english_text: Some(english.to_string()),
            chinese_text: chinese.map(|c| c.to_string()),
        }
    }

    pub fn to_utterance(&self) -> Utterance {
        Utterance {
            begin_time: self.begin_time,
            end_time: self.end_time,
            source_text: self.english_text.clone().unwrap_or_default(),
            target_text: self.chinese_text.clone(),
        }
    }
}

/// A vocabulary annotation of a subtitle line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: i64,
    pub subtitle_id: i64,
    pub key_word: String,
    pub phonetic_symbol: Option<String>,
    pub explain_text: Option<String>,
    /// COCA rank cached on the row
    pub coca: Option<i64>,
    pub is_selected: bool,
}

impl KeywordRecord {
    pub fn new(subtitle_id: i64, key_word: &str, phonetic: &str, explain: &str, is_selected: bool) -> Self {
        Self {
            id: 0,
            subtitle_id,
            key_word: key_word.to_string(),
            phonetic_symbol: Some(phonetic.to_string()),
            explain_text: Some(explain.to_string()),
            coca: None,
            is_selected,
        }
    }

    pub fn with_coca(mut self, rank: i64) -> Self {
        self.coca = Some(rank);
        self
    }

    pub fn to_annotation(&self) -> VocabAnnotation {
        VocabAnnotation {
            word: self.key_word.clone(),
            phonetic: self.phonetic_symbol.clone().unwrap_or_default(),
            translation: self.explain_text.clone().unwrap_or_default(),
            frequency_rank: self.coca.and_then(|rank| u32::try_from(rank).ok()),
            selected: self.is_selected,
        }
    }
}
