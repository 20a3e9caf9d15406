/*!
 * Source-text segmentation.
 *
 * Text is first split into sentences at tokens ending with `.`, `!` or `?`.
 * Each sentence is then cut into clause-sized units: a connective word opens
 * a new unit, and a token carrying clause punctuation closes the current one.
 */

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::models::{SegmentText, TimedSegment, Utterance};
use crate::segmentation::{aligner, paired};

/// Words that open a new unit when they follow non-empty text
static CONNECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "but", "or", "so", "yet", "for", "nor", "because", "since", "although", "while",
        "when", "where", "if", "however", "therefore", "moreover", "furthermore", "nevertheless",
    ]
    .into_iter()
    .collect()
});

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

const CLAUSE_PUNCTUATION: [char; 10] = [',', ';', ':', '-', '–', '—', '(', ')', '[', ']'];

/// Collapse whitespace runs into single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a whitespace-normalized text into sentences, keeping terminators
fn split_sentences(text: &str) -> Vec<Vec<&str>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for token in text.split_whitespace() {
        current.push(token);
        if token.ends_with(SENTENCE_TERMINATORS) {
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

fn is_connective(token: &str) -> bool {
    let bare = token
        .trim_matches(|c: char| CLAUSE_PUNCTUATION.contains(&c) || SENTENCE_TERMINATORS.contains(&c) || c == '"' || c == '\'')
        .to_lowercase();
    CONNECTIVES.contains(bare.as_str())
}

fn has_clause_punctuation(token: &str) -> bool {
    token.contains(CLAUSE_PUNCTUATION)
}

/// Split text into ordered units; joining them with single spaces gives the
/// whitespace-normalized input
pub fn split_into_units(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut units = Vec::new();

    for sentence in split_sentences(&normalized) {
        let mut current: Vec<&str> = Vec::new();

        for token in sentence {
            if is_connective(token) && !current.is_empty() {
                units.push(current.join(" "));
                current.clear();
            }

            current.push(token);

            if has_clause_punctuation(token) {
                units.push(current.join(" "));
                current.clear();
            }
        }

        if !current.is_empty() {
            units.push(current.join(" "));
        }
    }

    units
}

/// Segment one utterance and allocate its interval across the segments
///
/// An utterance with no text yields no segments.
pub fn split_utterance(utterance: &Utterance) -> Vec<TimedSegment> {
    let source = utterance.source_text.trim();

    let texts: Vec<SegmentText> = match utterance.target() {
        None => split_into_units(source)
            .into_iter()
            .map(SegmentText::mono)
            .collect(),
        Some(target) if source.is_empty() => paired::split_clauses(target)
            .into_iter()
            .map(SegmentText::mono)
            .collect(),
        Some(target) => {
            let units = split_into_units(source);
            let pieces = paired::split_to_count(target, units.len());
            aligner::align(&units, &pieces)
                .into_iter()
                .map(|(source, target)| SegmentText::bilingual(source, target))
                .collect()
        }
    };

    if texts.is_empty() {
        debug!(
            "No segments produced for utterance at {:.3}s-{:.3}s",
            utterance.begin_time, utterance.end_time
        );
        return Vec::new();
    }

    let weights: Vec<usize> = texts.iter().map(SegmentText::weight).collect();
    let spans = aligner::allocate(&weights, utterance.begin_time, utterance.end_time);

    texts
        .into_iter()
        .zip(spans)
        .map(|(text, (begin, end))| TimedSegment::new(begin, end, text))
        .collect()
}
