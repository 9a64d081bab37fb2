//! Lexical relevance scoring.
//!
//! Scores are plain substring heuristics over lower-cased text. There is no
//! tokenizer or stemming; a query word matches any substring of the content.

use crate::types::{Document, ScoredDocument};

/// Weight when the whole query appears in the title.
pub const TITLE_WEIGHT: f64 = 3.0;

/// Weight for each query word found in the content.
pub const CONTENT_WORD_WEIGHT: f64 = 1.0;

/// Weight for each document tag found in the query.
pub const TAG_WEIGHT: f64 = 2.0;

/// Weight when both query and document location mention the anchor place.
pub const LOCALITY_WEIGHT: f64 = 1.5;

/// Place name that triggers the locality boost.
pub const LOCALITY_ANCHOR: &str = "olathe";

/// Default number of results when the caller passes 0.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Score one document against an already lower-cased query.
pub fn score_document(query_lower: &str, document: &Document) -> f64 {
    let mut score = 0.0;

    if document.title.to_lowercase().contains(query_lower) {
        score += TITLE_WEIGHT;
    }

    let content = document.content.to_lowercase();
    score += query_lower
        .split_whitespace()
        .filter(|word| content.contains(word))
        .count() as f64
        * CONTENT_WORD_WEIGHT;

    // Tag inside query, not query inside tag. Tags match verbatim, so an
    // empty tag matches every query.
    score += document
        .tags
        .iter()
        .filter(|tag| query_lower.contains(tag.to_lowercase().as_str()))
        .count() as f64
        * TAG_WEIGHT;

    let location_matches = document
        .location
        .as_deref()
        .map(|l| l.to_lowercase().contains(LOCALITY_ANCHOR))
        .unwrap_or(false);
    if location_matches && query_lower.contains(LOCALITY_ANCHOR) {
        score += LOCALITY_WEIGHT;
    }

    score
}

/// Rank documents for a query.
///
/// Zero-score documents are dropped, the rest sorted by descending score
/// (stable, so ties keep collection order) and truncated to `limit`
/// (`DEFAULT_SEARCH_LIMIT` when `limit` is 0).
pub fn rank(query: &str, documents: &[Document], limit: usize) -> Vec<ScoredDocument> {
    let limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };
    let query_lower = query.to_lowercase();

    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .filter_map(|document| {
            let score = score_document(&query_lower, document);
            (score > 0.0).then(|| ScoredDocument {
                document: document.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, content: &str, location: Option<&str>, tags: &[&str]) -> Document {
        let mut document = Document::new(title, content, "test").with_tags(tags.iter().copied());
        document.location = location.map(str::to_string);
        document
    }

    #[test]
    fn test_title_match_is_whole_query() {
        let d = doc("Hot Pursuit Strategy - Highway", "", None, &[]);
        assert_eq!(score_document("pursuit strategy", &d), TITLE_WEIGHT);
        assert_eq!(score_document("strategy pursuit", &d), 0.0);
    }

    #[test]
    fn test_content_counts_each_word() {
        let d = doc("", "Deploy spike strips at exit ramps", None, &[]);
        assert_eq!(score_document("spike strips ramps", &d), 3.0);
        // Words match as substrings
        assert_eq!(score_document("ramp", &d), 1.0);
        // Repeated query words count every time
        assert_eq!(score_document("spike spike", &d), 2.0);
    }

    #[test]
    fn test_tag_direction_is_tag_inside_query() {
        let d = doc("", "", None, &["Pursuit", "highway"]);
        assert_eq!(score_document("highway pursuits near me", &d), 2.0 * TAG_WEIGHT);
        // Query inside tag does not count
        let multi = doc("", "", None, &["hot pursuit"]);
        assert_eq!(score_document("pursuit", &multi), 0.0);
    }

    #[test]
    fn test_tags_match_verbatim() {
        // Empty tag is a substring of every query
        let empty = doc("", "", None, &[""]);
        assert_eq!(score_document("anything", &empty), TAG_WEIGHT);

        // Surrounding whitespace is part of the tag
        let padded = doc("", "", None, &[" pursuit"]);
        assert_eq!(score_document("pursuit", &padded), 0.0);
        assert_eq!(score_document("hot pursuit", &padded), TAG_WEIGHT);
    }

    #[test]
    fn test_locality_boost_needs_both_sides() {
        let local = doc("", "", Some("Olathe, KS"), &[]);
        let remote = doc("", "", Some("Lenexa, KS"), &[]);
        let unknown = doc("", "", None, &[]);

        assert_eq!(score_document("olathe", &local), LOCALITY_WEIGHT);
        assert_eq!(score_document("olathe", &remote), 0.0);
        assert_eq!(score_document("olathe", &unknown), 0.0);
        assert_eq!(score_document("kansas", &local), 0.0);
    }

    #[test]
    fn test_rank_orders_and_excludes_zero() {
        let documents = vec![
            doc("Unrelated", "cooking pasta", None, &[]),
            doc("Arrests", "arrest patterns", None, &["arrests"]),
            doc("Pursuit", "pursuit arrest data", None, &["pursuit"]),
        ];

        let results = rank("pursuit arrest", &documents, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.title, "Pursuit");
        assert!(results[0].score >= results[1].score);
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn test_rank_zero_limit_uses_default() {
        let documents: Vec<Document> = (0..8)
            .map(|i| doc(&format!("Doc {}", i), "crime", None, &[]))
            .collect();

        assert_eq!(rank("crime", &documents, 0).len(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(rank("crime", &documents, 2).len(), 2);
    }

    #[test]
    fn test_rank_is_case_insensitive() {
        let documents = vec![doc("Olathe Crime Statistics", "", None, &[])];
        let results = rank("OLATHE CRIME", &documents, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, TITLE_WEIGHT);
    }
}
