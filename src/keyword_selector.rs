/*!
 * Focus-word selection.
 *
 * Among the annotations a user marked as selected, the one with the highest
 * corpus rank wins (a higher rank is a rarer, more valuable word). Shorter
 * words break ties, then input order. A missing rank counts as zero.
 */

use std::cmp::Ordering;

use crate::models::VocabAnnotation;

fn importance_order(a: &VocabAnnotation, b: &VocabAnnotation) -> Ordering {
    let rank_a = a.frequency_rank.unwrap_or(0);
    let rank_b = b.frequency_rank.unwrap_or(0);

    rank_b
        .cmp(&rank_a)
        .then_with(|| a.word.chars().count().cmp(&b.word.chars().count()))
}

/// Selected annotations from most to least important
pub fn ordered_candidates(annotations: &[VocabAnnotation]) -> Vec<&VocabAnnotation> {
    let mut candidates: Vec<&VocabAnnotation> =
        annotations.iter().filter(|a| a.selected).collect();
    // sort_by is stable, so equal keys keep input order
    candidates.sort_by(|a, b| importance_order(a, b));
    candidates
}

/// Pick the focus word for one utterance, if any annotation is selected
pub fn select_focus_word(annotations: &[VocabAnnotation]) -> Option<&VocabAnnotation> {
    ordered_candidates(annotations).into_iter().next()
}
