//! Translation-side splitting.
//!
//! The translation is produced independently of the source segmentation, so
//! it has to be cut into exactly as many pieces as the source has units.
//! The cut is positional and approximate; it follows clause punctuation when
//! there is enough of it and falls back to equal character counts otherwise.

const CLAUSE_MARKS: [char; 13] = [
    '，', '。', '！', '？', '；', '：', '、', ',', '.', '!', '?', ';', ':',
];

fn is_clause_mark(c: char) -> bool {
    CLAUSE_MARKS.contains(&c)
}

/// Byte ranges of the non-blank clauses of `text`, each ending after its mark
fn clause_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if is_clause_mark(c) {
            let end = i + c.len_utf8();
            if !text[start..end].trim().is_empty() {
                spans.push((start, end));
            }
            start = end;
        }
    }

    if start < text.len() && !text[start..].trim().is_empty() {
        spans.push((start, text.len()));
    }

    spans
}

/// Split text after every clause mark, keeping the mark with its clause
pub fn split_clauses(text: &str) -> Vec<String> {
    clause_spans(text)
        .into_iter()
        .map(|(start, end)| text[start..end].trim().to_string())
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Split text into exactly `count` pieces, padding with empty strings
pub fn split_to_count(text: &str, count: usize) -> Vec<String> {
    let text = text.trim();

    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![text.to_string()];
    }

    let spans = clause_spans(text);
    let mut pieces = if spans.len() >= count {
        merge_clauses(text, &spans, count)
    } else {
        smart_split(text, count)
    };

    pieces.retain(|piece| !piece.is_empty());
    pieces.resize(count, String::new());
    pieces
}

/// Merge clauses into `count` evenly spaced groups
fn merge_clauses(text: &str, spans: &[(usize, usize)], count: usize) -> Vec<String> {
    let step = spans.len() as f64 / count as f64;

    (0..count)
        .map(|i| {
            let first = (i as f64 * step).floor() as usize;
            let from = if i == 0 { 0 } else { spans[first].0 };
            let to = if i == count - 1 {
                text.len()
            } else {
                spans[((i + 1) as f64 * step).floor() as usize].0
            };
            text[from..to].trim().to_string()
        })
        .collect()
}

/// Cut at punctuation positions when there are enough of them, otherwise
/// by equal character counts
fn smart_split(text: &str, count: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let candidates: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(idx, c)| is_clause_mark(**c) && idx + 1 < total)
        .map(|(idx, _)| idx + 1)
        .collect();

    let cuts: Vec<usize> = if candidates.len() >= count - 1 {
        let step = candidates.len() as f64 / (count - 1) as f64;
        (0..count - 1)
            .map(|i| candidates[(i as f64 * step).floor() as usize])
            .collect()
    } else {
        let chunk = total / count;
        (1..count).map(|i| i * chunk).collect()
    };

    let mut boundaries = Vec::with_capacity(count + 1);
    boundaries.push(0);
    boundaries.extend(cuts);
    boundaries.push(total);

    boundaries
        .windows(2)
        .map(|pair| chars[pair[0]..pair[1]].iter().collect::<String>().trim().to_string())
        .collect()
}
