/*!
 * Positional alignment of source units with translation pieces, and
 * proportional time allocation across the aligned segments.
 */

use log::debug;

/// Pair units by position, padding the shorter side with empty strings
///
/// Pairs that are empty on both sides are dropped.
pub fn align(source_units: &[String], target_units: &[String]) -> Vec<(String, String)> {
    let len = source_units.len().max(target_units.len());

    (0..len)
        .map(|i| {
            let source = source_units.get(i).cloned().unwrap_or_default();
            let target = target_units.get(i).cloned().unwrap_or_default();
            (source, target)
        })
        .filter(|(source, target)| !source.is_empty() || !target.is_empty())
        .collect()
}

/// Split `[begin, end)` into contiguous spans proportional to `weights`
///
/// The last span always ends exactly at `end`. A zero total weight or an
/// empty or inverted interval falls back to an equal split of the clamped
/// duration.
pub fn allocate(weights: &[usize], begin: f64, end: f64) -> Vec<(f64, f64)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let duration = end - begin;
    let total: usize = weights.iter().sum();
    let count = weights.len();

    if total == 0 || duration <= 0.0 {
        debug!(
            "Degenerate allocation (weight {}, duration {:.3}s), splitting equally",
            total, duration
        );
        let clamped = duration.max(0.0);
        let share = clamped / count as f64;
        return (0..count)
            .map(|i| {
                let start = begin + share * i as f64;
                let stop = if i == count - 1 {
                    begin + clamped
                } else {
                    begin + share * (i + 1) as f64
                };
                (start, stop)
            })
            .collect();
    }

    let mut spans = Vec::with_capacity(count);
    let mut cursor = begin;

    for (i, weight) in weights.iter().enumerate() {
        let stop = if i == count - 1 {
            end
        } else {
            cursor + duration * (*weight as f64 / total as f64)
        };
        spans.push((cursor, stop));
        cursor = stop;
    }

    spans
}
