/*!
 * Semantic segmentation of utterances into display-sized timed segments.
 *
 * - `segmenter`: splits source text into units and drives per-utterance segmentation
 * - `paired`: splits translation text into a requested number of pieces
 * - `aligner`: pairs units positionally and allocates time proportionally
 */

pub mod aligner;
pub mod paired;
pub mod segmenter;

// Re-export main entry points
pub use self::aligner::{align, allocate};
pub use self::paired::{split_clauses, split_to_count};
pub use self::segmenter::{split_into_units, split_utterance};
