/*!
 * Tests for focus word selection and frequency ranks
 */

use vocabcut::frequency::{normalize_word, FrequencyBand, FrequencyLookup, FrequencyTable};
use vocabcut::keyword_selector::{ordered_candidates, select_focus_word};
use vocabcut::models::VocabAnnotation;

fn annotation(word: &str, rank: Option<u32>, selected: bool) -> VocabAnnotation {
    VocabAnnotation::new(word, "", "", rank, selected)
}

#[test]
fn test_selectFocusWord_withEqualRank_shouldPreferShorterWord() {
    let annotations = vec![
        annotation("inconvenient", Some(18000), true),
        annotation("brisk", Some(18000), true),
    ];
    assert_eq!(select_focus_word(&annotations).unwrap().word, "brisk");
}

#[test]
fn test_selectFocusWord_withIdenticalKeys_shouldKeepFirst() {
    let annotations = vec![
        annotation("north", Some(700), true),
        annotation("south", Some(700), true),
    ];
    assert_eq!(select_focus_word(&annotations).unwrap().word, "north");
}

#[test]
fn test_selectFocusWord_withMissingRanks_shouldRankThemLast() {
    let annotations = vec![
        annotation("a", None, true),
        annotation("bb", Some(1), true),
    ];
    assert_eq!(select_focus_word(&annotations).unwrap().word, "bb");

    let unranked = vec![annotation("long word", None, true), annotation("tiny", None, true)];
    assert_eq!(select_focus_word(&unranked).unwrap().word, "tiny");
}

#[test]
fn test_orderedCandidates_shouldSkipUnselected() {
    let annotations = vec![
        annotation("keep", Some(10), true),
        annotation("drop", Some(50000), false),
        annotation("also", Some(20), true),
    ];
    let words: Vec<&str> = ordered_candidates(&annotations).iter().map(|a| a.word.as_str()).collect();
    assert_eq!(words, vec!["also", "keep"]);
}

#[test]
fn test_frequencyTable_shouldResolveDerivedForms() {
    let table: FrequencyTable = [("happy", 900u32), ("kind", 400), ("load", 1500)].into_iter().collect();

    assert_eq!(table.rank("HAPPY"), Some(900));
    assert_eq!(table.rank("kindness"), Some(900));
    assert_eq!(table.rank("unload"), Some(2000));
    assert_eq!(table.rank("xyz"), None);
    assert_eq!(table.rank("  !! "), None);
}

#[test]
fn test_frequencyTable_withPhrase_shouldApplyPhraseFloor() {
    let table: FrequencyTable = [("look", 300u32)].into_iter().collect();
    // (300 + 10000) / 2 + 5000 = 10150, below the floor
    assert_eq!(table.rank("look after"), Some(20000));
}

#[test]
fn test_normalizeWord_shouldStripPunctuation() {
    assert_eq!(normalize_word("  Well-Known! "), "well-known");
    assert_eq!(normalize_word("\"quote\""), "quote");
}

#[test]
fn test_frequencyBand_fromRank_shouldUseBoundaries() {
    assert_eq!(FrequencyBand::from_rank(100), FrequencyBand::VeryHigh);
    assert_eq!(FrequencyBand::from_rank(101), FrequencyBand::High);
    assert_eq!(FrequencyBand::from_rank(1000), FrequencyBand::MidHigh);
    assert_eq!(FrequencyBand::from_rank(2000), FrequencyBand::Mid);
    assert_eq!(FrequencyBand::from_rank(5000), FrequencyBand::MidLow);
    assert_eq!(FrequencyBand::from_rank(10000), FrequencyBand::Low);
    assert_eq!(FrequencyBand::from_rank(10001), FrequencyBand::VeryLow);
}
