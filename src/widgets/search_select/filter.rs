//! Option filtering using nucleo-matcher.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// How the query is matched against option text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Fuzzy subsequence matching.
    #[default]
    Fuzzy,
    /// The option text must start with the query.
    Prefix,
}

/// Result of a filter operation.
#[derive(Debug, Clone)]
pub struct FilterMatch {
    /// Index of the matched item in the original list.
    pub index: usize,
    /// Match score (higher is better).
    pub score: u32,
}

/// Filter options against a query.
///
/// Returns matches sorted by score (highest first). An empty query returns
/// all items in their original order with score 0. Matching is
/// case-insensitive.
///
/// # Example
///
/// ```ignore
/// let labels = vec!["apple".to_string(), "banana".to_string()];
/// let matches = filter_options("ap", &labels, MatchMode::Fuzzy);
/// assert_eq!(matches[0].index, 0);
/// ```
pub fn filter_options(query: &str, items: &[String], mode: MatchMode) -> Vec<FilterMatch> {
    // Empty query returns all items
    if query.is_empty() {
        return items
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    let atom_kind = match mode {
        MatchMode::Fuzzy => AtomKind::Fuzzy,
        MatchMode::Prefix => AtomKind::Prefix,
    };
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, atom_kind);

    let mut matches: Vec<FilterMatch> = items
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    // Sort by score descending (higher score = better match)
    matches.sort_by(|a, b| b.score.cmp(&a.score));

    matches
}
