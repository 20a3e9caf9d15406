/*!
 * Tests for utterance segmentation, alignment and time allocation
 */

use vocabcut::models::{SegmentText, Utterance};
use vocabcut::segmentation::segmenter::normalize_whitespace;
use vocabcut::segmentation::{allocate, split_into_units, split_to_count, split_utterance};

fn assert_contiguous(spans: &[(f64, f64)], begin: f64, end: f64) {
    assert_eq!(spans.first().map(|s| s.0), Some(begin));
    assert_eq!(spans.last().map(|s| s.1), Some(end));
    for pair in spans.windows(2) {
        assert_eq!(pair[0].1, pair[1].0, "spans must touch");
    }
}

#[test]
fn test_splitIntoUnits_withAnyText_shouldCoverInputExactly() {
    let inputs = [
        "Well, I think so. But we should leave now!",
        "  spaced    out\ttext  here  ",
        "Nothing to split",
        "Ask him, and then call her; because time matters.",
    ];

    for input in inputs {
        let units = split_into_units(input);
        assert_eq!(units.join(" "), normalize_whitespace(input), "coverage failed for {:?}", input);
        assert!(units.iter().all(|u| !u.is_empty()));
    }
}

#[test]
fn test_splitIntoUnits_withConnective_shouldStartNewUnit() {
    let units = split_into_units("We waited because the train was late");
    assert_eq!(units, vec!["We waited", "because the train was late"]);
}

#[test]
fn test_splitIntoUnits_withBlankText_shouldReturnNothing() {
    assert!(split_into_units("   \n ").is_empty());
}

#[test]
fn test_splitToCount_shouldAlwaysReturnRequestedCount() {
    for count in 0..6 {
        assert_eq!(split_to_count("我们明天见面吧", count).len(), count);
        assert_eq!(split_to_count("", count).len(), count);
    }
}

#[test]
fn test_allocate_shouldPartitionProportionally() {
    let spans = allocate(&[1, 3], 10.0, 14.0);
    assert_contiguous(&spans, 10.0, 14.0);
    assert!((spans[0].1 - 11.0).abs() < 1e-9);
}

#[test]
fn test_allocate_withZeroDuration_shouldProduceEmptySpans() {
    let spans = allocate(&[4, 4, 4], 3.0, 3.0);
    assert_eq!(spans, vec![(3.0, 3.0), (3.0, 3.0), (3.0, 3.0)]);
}

#[test]
fn test_splitUtterance_withBilingualText_shouldPairClauses() {
    let utterance = Utterance::new(
        0.0,
        6.0,
        "Hello there, my friend. How are you?",
        Some("你好，我的朋友。你好吗？"),
    );

    let segments = split_utterance(&utterance);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].text, SegmentText::bilingual("Hello there,", "你好，"));
    assert_eq!(segments[1].text, SegmentText::bilingual("my friend.", "我的朋友。"));
    assert_eq!(segments[2].text, SegmentText::bilingual("How are you?", "你好吗？"));

    let spans: Vec<(f64, f64)> = segments.iter().map(|s| (s.begin_time, s.end_time)).collect();
    assert_contiguous(&spans, 0.0, 6.0);
}

#[test]
fn test_splitUtterance_withoutTranslation_shouldProduceMonoSegments() {
    let segments = split_utterance(&Utterance::new(1.0, 2.0, "Stop. Look around.", None));
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, SegmentText::mono("Stop."));
    assert_eq!(segments[1].end_time, 2.0);
}

#[test]
fn test_splitUtterance_withEqualLengthUnits_shouldGiveEqualDurations() {
    let segments = split_utterance(&Utterance::new(2.0, 8.0, "Stop. Look. Wait.", None));
    assert_eq!(segments.len(), 3);
    for segment in &segments {
        assert!((segment.end_time - segment.begin_time - 2.0).abs() < 1e-9);
    }

    let bilingual = split_utterance(&Utterance::new(0.0, 4.0, "Hi Tom. Go now.", Some("你好汤姆。马上走。")));
    assert_eq!(bilingual.len(), 2);
    let first = bilingual[0].end_time - bilingual[0].begin_time;
    let second = bilingual[1].end_time - bilingual[1].begin_time;
    assert!((first - second).abs() < 1e-9);
}

#[test]
fn test_splitUtterance_withOnlyTranslation_shouldUseTranslationClauses() {
    let segments = split_utterance(&Utterance::new(0.0, 2.0, "  ", Some("一，二")));
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, SegmentText::mono("一，"));
    assert_eq!(segments[1].text, SegmentText::mono("二"));
}

#[test]
fn test_splitUtterance_withNoText_shouldReturnNothing() {
    assert!(split_utterance(&Utterance::new(0.0, 2.0, "", None)).is_empty());
    assert!(split_utterance(&Utterance::new(0.0, 2.0, " ", Some(" "))).is_empty());
}
