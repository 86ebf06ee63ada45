//! Pairwise textual similarity between sources.
//!
//! When both sources carry a [`Fingerprint`](crate::text::Fingerprint), heads
//! and tails are compared independently and averaged. Otherwise the full
//! normalized contents are compared. Both paths use word-set Jaccard, so the
//! result is symmetric and lies in `[0, 1]`.

use crate::models::Source;
use crate::text::text_similarity;

/// Symmetric similarity of two normalized sources.
pub fn similarity(a: &Source, b: &Source) -> f64 {
    match (&a.fingerprint, &b.fingerprint) {
        (Some(fa), Some(fb)) => {
            let head = text_similarity(&fa.head, &fb.head);
            let tail = text_similarity(&fa.tail, &fb.tail);
            (head + tail) / 2.0
        }
        _ => text_similarity(&a.normalized_content, &b.normalized_content),
    }
}
