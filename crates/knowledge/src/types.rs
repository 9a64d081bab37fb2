//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of retrievable knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier; assigned on add when empty
    #[serde(default)]
    pub id: String,

    /// Title, matched as a whole against the query
    pub title: String,

    /// Body text, matched word by word
    pub content: String,

    /// Display-only classification (e.g. "strategy", "crime_stats")
    #[serde(default)]
    pub category: String,

    /// Geographic or contextual tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Labels matched against the query; order is kept for display
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    /// Create a document without an id; the store assigns one on add.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            location: None,
            tags: Vec::new(),
        }
    }

    /// Set an explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the location tag.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Location if present and non-blank.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// A document paired with its relevance score for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Summary of the document store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Number of documents
    pub document_count: usize,

    /// Documents per category
    pub categories: BTreeMap<String, usize>,

    /// Size of the persisted collection in bytes
    pub storage_bytes: u64,

    /// Last time the collection was written
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("Title", "Body", "strategy")
            .with_id("rag-100")
            .with_location("Olathe, KS")
            .with_tags(["pursuit", "urban"]);

        assert_eq!(doc.id, "rag-100");
        assert_eq!(doc.location(), Some("Olathe, KS"));
        assert_eq!(doc.tags, vec!["pursuit".to_string(), "urban".to_string()]);
    }

    #[test]
    fn test_blank_location_is_absent() {
        let doc = Document::new("Title", "Body", "history").with_location("  ");
        assert_eq!(doc.location(), None);
    }

    #[test]
    fn test_document_json_shape() {
        let json = r#"{"id":"rag-001","title":"T","content":"C","category":"history","tags":["a"]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.location, None);

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("location").is_none());
        assert_eq!(value["tags"][0], "a");
    }
}
