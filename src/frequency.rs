/*!
 * Corpus frequency lookup.
 *
 * Ranks come from a COCA-style list where rank 1 is the most frequent word.
 * Lookups fall back to phrase averaging and affix stripping when the exact
 * word is not listed.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Rank assigned to a phrase part that is not listed
const MISSING_PART_RANK: u32 = 10000;

/// Floor for phrase ranks, since phrases are rarer than their parts
const MIN_PHRASE_RANK: u32 = 20000;

const PHRASE_PENALTY: u32 = 5000;

/// Added to the rank of a root found by affix stripping
const DERIVED_PENALTY: u32 = 500;

const SUFFIXES: [&str; 11] = [
    "s", "es", "ed", "ing", "er", "est", "ly", "tion", "sion", "ness", "ment",
];

const PREFIXES: [&str; 8] = ["un", "re", "pre", "dis", "mis", "over", "under", "out"];

/// Source of corpus frequency ranks
pub trait FrequencyLookup: Send + Sync {
    /// Rank for a word, lower meaning more frequent
    fn rank(&self, word: &str) -> Option<u32>;
}

/// Lowercase and strip everything except word characters, spaces and hyphens
pub fn normalize_word(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolve a rank through `exact`, falling back to phrase and root lookups
///
/// `exact` receives normalized words only.
pub fn resolve_rank<F>(word: &str, exact: F) -> Option<u32>
where
    F: Fn(&str) -> Option<u32>,
{
    let normalized = normalize_word(word);
    if normalized.is_empty() {
        return None;
    }

    if let Some(rank) = exact(&normalized) {
        return Some(rank);
    }

    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() > 1 {
        let sum: u64 = parts
            .iter()
            .map(|part| exact(part).unwrap_or(MISSING_PART_RANK) as u64)
            .sum();
        let average = (sum / parts.len() as u64) as u32;
        return Some(MIN_PHRASE_RANK.max(average.saturating_add(PHRASE_PENALTY)));
    }

    root_rank(&normalized, &exact)
}

fn root_rank<F>(word: &str, exact: &F) -> Option<u32>
where
    F: Fn(&str) -> Option<u32>,
{
    let len = word.chars().count();

    for suffix in SUFFIXES {
        if let Some(root) = word.strip_suffix(suffix) {
            if len - suffix.len() > 2 {
                if let Some(rank) = exact(root) {
                    return Some(rank.saturating_add(DERIVED_PENALTY));
                }
            }
        }
    }

    for prefix in PREFIXES {
        if let Some(root) = word.strip_prefix(prefix) {
            if len - prefix.len() > 2 {
                if let Some(rank) = exact(root) {
                    return Some(rank.saturating_add(DERIVED_PENALTY));
                }
            }
        }
    }

    None
}

/// In-memory, case-insensitive frequency table
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    ranks: HashMap<String, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str, rank: u32) {
        self.ranks.insert(normalize_word(word), rank);
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (word, rank) in iter {
            table.insert(word.as_ref(), rank);
        }
        table
    }
}

impl FrequencyLookup for FrequencyTable {
    fn rank(&self, word: &str) -> Option<u32> {
        resolve_rank(word, |w| self.ranks.get(w).copied())
    }
}

/// Coarse frequency band used in previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    VeryHigh,
    High,
    MidHigh,
    Mid,
    MidLow,
    Low,
    VeryLow,
}

impl FrequencyBand {
    pub fn from_rank(rank: u32) -> Self {
        match rank {
            0..=100 => Self::VeryHigh,
            101..=500 => Self::High,
            501..=1000 => Self::MidHigh,
            1001..=2000 => Self::Mid,
            2001..=5000 => Self::MidLow,
            5001..=10000 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very high",
            Self::High => "high",
            Self::MidHigh => "mid-high",
            Self::Mid => "mid",
            Self::MidLow => "mid-low",
            Self::Low => "low",
            Self::VeryLow => "very low",
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
