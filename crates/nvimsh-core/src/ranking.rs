//! Scoring primitives and result ordering.
//!
//! Ranks follow edit-distance semantics: `0` is a perfect match and larger
//! values are weaker. "No match" is `None` rather than a number until the
//! two scores are combined by [`search_rank`], which reproduces the
//! long-standing averaging rule of the public API.

use std::cmp::Ordering;

use crate::types::Ranked;

/// Stand-in value for a missing score inside [`search_rank`].
pub const NO_MATCH: i32 = -1;

/// Fuzzy-matches `query` against a plugin name.
///
/// Matching ignores case. The name matches when every character of the
/// query appears in it in order; the score is then the Levenshtein distance
/// between the two, so `telescope` scores 0 against `telescope` and 4
/// against `telescope-fzf`.
///
/// For a subsequence that distance is exactly the difference in character
/// counts: it can never be smaller, and deleting the unmatched characters of
/// the name reaches it.
pub fn name_score(query: &str, name: &str) -> Option<u32> {
    let query = query.to_lowercase();
    let name = name.to_lowercase();

    if !is_subsequence(&query, &name) {
        return None;
    }

    u32::try_from(name.chars().count() - query.chars().count()).ok()
}

/// `Some(0)` when `query` equals one of `tags`, ignoring case.
///
/// Only whole tags count: `fuzzy` never matches `fuzzy-finder`.
pub fn tag_score<S: AsRef<str>>(query: &str, tags: &[S]) -> Option<u32> {
    let query = query.to_lowercase();
    tags.iter()
        .any(|tag| tag.as_ref().to_lowercase() == query)
        .then_some(0)
}

/// Combines name and tag scores into a search rank.
///
/// Missing scores count as [`NO_MATCH`], the two are averaged with integer
/// division truncating toward zero, and the entry is admitted when the
/// average is not negative. A name match is therefore always admitted even
/// without a tag match, since `(0 + -1) / 2 == 0`.
pub fn search_rank(name: Option<u32>, tag: Option<u32>) -> Option<i32> {
    let as_rank = |score: Option<u32>| {
        score
            .map(|s| i32::try_from(s).unwrap_or(i32::MAX))
            .unwrap_or(NO_MATCH)
    };

    let rank = as_rank(name).saturating_add(as_rank(tag)) / 2;
    (rank >= 0).then_some(rank)
}

/// Orders results by ascending rank, then by descending stars.
///
/// The sort is stable, so fully tied entries keep their snapshot order.
pub fn sort_ranked(results: &mut [Ranked]) {
    results.sort_by(compare_ranked);
}

pub fn compare_ranked(a: &Ranked, b: &Ranked) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.plugin.stars.cmp(&a.plugin.stars))
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
