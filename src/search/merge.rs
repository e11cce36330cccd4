use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::scoring::ScoreResult;

/// Why an identifier is in a merged result list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "origin", rename_all = "camelCase")]
pub enum MatchOrigin {
    /// Matched by the caller's lexical search.
    Lexical,
    /// Added from semantic ranking.
    Recommended { score: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedMatch {
    pub identifier: String,
    #[serde(flatten)]
    pub origin: MatchOrigin,
}

/// Default identifier normalization: case-insensitive.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.to_lowercase()
}

/// Appends semantic hits to a lexical result list.
///
/// Lexical matches keep their order and come first. Semantic hits follow by descending
/// score, skipping any whose normalized identifier is already present.
pub fn merge_with_lexical<F>(
    lexical: Vec<String>,
    mut semantic: Vec<ScoreResult>,
    normalize: F,
) -> Vec<MergedMatch>
where
    F: Fn(&str) -> String,
{
    let mut seen: HashSet<String> = lexical.iter().map(|id| normalize(id)).collect();
    let mut merged: Vec<MergedMatch> = lexical
        .into_iter()
        .map(|identifier| MergedMatch {
            identifier,
            origin: MatchOrigin::Lexical,
        })
        .collect();

    semantic.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    for hit in semantic {
        if seen.insert(normalize(&hit.identifier)) {
            merged.push(MergedMatch {
                identifier: hit.identifier,
                origin: MatchOrigin::Recommended { score: hit.score },
            });
        }
    }

    merged
}
