// src/checker/suggest.rs
// =============================================================================
// "Did you mean ...?" suggestions for ids and pages that do not exist.
//
// Candidates are ranked by Levenshtein edit distance (from `strsim`).
// Only distances 1..=3 are kept: 0 would be an exact match (so there is no
// broken link to begin with), and anything further away is mostly noise for
// slug-style ids such as `builder-method-setters`.
// =============================================================================

use serde::Serialize;

/// Suggestions further away than this are dropped.
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

/// One existing id or page that is close to what a link asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub candidate: String,
    pub distance: usize,
}

/// Returns the candidates within edit distance 1..=3 of `missing`, closest
/// first.
///
/// Candidates at the same distance keep the order `candidates` yielded them
/// in, so the output is stable as long as the input order is.
pub fn suggest<'a, I>(candidates: I, missing: &str) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = strsim::levenshtein(candidate, missing);
            (1..=MAX_SUGGESTION_DISTANCE)
                .contains(&distance)
                .then(|| Suggestion {
                    candidate: candidate.to_string(),
                    distance,
                })
        })
        .collect();

    // sort_by_key is stable, which keeps discovery order between ties
    suggestions.sort_by_key(|suggestion| suggestion.distance);
    suggestions
}
