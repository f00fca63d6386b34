//! Approximate matching of message ids.
//!
//! Similarity is the character-level diff ratio `2 * matches / (len_a + len_b)`
//! computed on lowercased, trimmed ids, the same measure gettext tooling uses
//! for fuzzy merges.

use similar::TextDiff;

/// Default minimum similarity for a fuzzy match.
pub const DEFAULT_CUTOFF: f32 = 0.6;

fn normalize(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Similarity in `[0, 1]` between two message ids.
pub fn similarity(a: &str, b: &str) -> f32 {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}

/// Index of the candidate most similar to `id`, if any reaches `cutoff`.
///
/// Ties go to the earliest candidate.
pub fn best_match<'a, I>(id: &str, candidates: I, cutoff: f32) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = similarity(id, candidate);
        if score < cutoff {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}
