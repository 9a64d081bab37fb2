//! Docs command handler.
//!
//! Lists, searches and edits the document store.

use super::print_json;
use clap::{Args, Subcommand};
use serpico_core::{config::AppConfig, AppError, AppResult};
use serpico_knowledge::{Document, DocumentStore};

/// Manage stored documents
#[derive(Args, Debug)]
pub struct DocsCommand {
    #[command(subcommand)]
    pub action: DocsAction,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum DocsAction {
    /// List all documents
    List {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one document
    Get {
        /// Document id
        id: String,
    },
    /// Rank documents against a query
    Search {
        /// Query text
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
    /// Add a document
    Add(DocumentFields),
    /// Replace fields of a document (its id never changes)
    Update {
        /// Document id
        id: String,

        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Delete a document
    Delete {
        /// Document id
        id: String,
    },
    /// Show collection statistics
    Stats,
}

/// Fields of a new document
#[derive(Args, Debug)]
pub struct DocumentFields {
    /// Explicit id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    #[arg(long, default_value = "general")]
    pub category: String,

    #[arg(long)]
    pub location: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Fields to change on an existing document
#[derive(Args, Debug)]
pub struct UpdateFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Replace all tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl UpdateFields {
    fn apply(&self, mut document: Document) -> Document {
        if let Some(title) = &self.title {
            document.title = title.clone();
        }
        if let Some(content) = &self.content {
            document.content = content.clone();
        }
        if let Some(category) = &self.category {
            document.category = category.clone();
        }
        if let Some(location) = &self.location {
            document.location = Some(location.clone()).filter(|l| !l.is_empty());
        }
        if !self.tags.is_empty() {
            document.tags = self.tags.clone();
        }
        document
    }
}

impl DocsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = DocumentStore::load(&config.data_dir())?;

        match &self.action {
            DocsAction::List { category } => {
                let documents: Vec<Document> = store
                    .all()
                    .into_iter()
                    .filter(|d| category.as_ref().map_or(true, |c| &d.category == c))
                    .collect();

                if self.json {
                    return print_json(&documents);
                }
                for document in &documents {
                    println!("{:<10} {:<12} {}", document.id, document.category, document.title);
                }
                println!("{} documents", documents.len());
            }
            DocsAction::Get { id } => {
                let document = store
                    .get(id)
                    .ok_or_else(|| AppError::Knowledge(format!("Document {} not found", id)))?;
                if self.json {
                    return print_json(&document);
                }
                print_document(&document);
            }
            DocsAction::Search { query, limit } => {
                let results = store.search(query, *limit);
                if self.json {
                    return print_json(&results);
                }
                if results.is_empty() {
                    println!("No matching documents");
                }
                for result in &results {
                    println!(
                        "{:>5.1}  {:<10} {}",
                        result.score, result.document.id, result.document.title
                    );
                }
            }
            DocsAction::Add(fields) => {
                let mut document =
                    Document::new(&fields.title, &fields.content, &fields.category)
                        .with_tags(fields.tags.iter().cloned());
                document.location = fields.location.clone().filter(|l| !l.is_empty());
                if let Some(id) = &fields.id {
                    document.id = id.clone();
                }

                let added = store.add(document)?;
                if self.json {
                    return print_json(&added);
                }
                println!("Added {}", added.id);
            }
            DocsAction::Update { id, fields } => {
                let existing = store
                    .get(id)
                    .ok_or_else(|| AppError::Knowledge(format!("Document {} not found", id)))?;

                match store.update(id, fields.apply(existing))? {
                    Some(updated) if self.json => return print_json(&updated),
                    Some(updated) => println!("Updated {}", updated.id),
                    // Deleted between the read and the write
                    None => {
                        return Err(AppError::Knowledge(format!("Document {} not found", id)))
                    }
                }
            }
            DocsAction::Delete { id } => {
                let removed = store.delete(id)?;
                if self.json {
                    return print_json(&serde_json::json!({ "id": id, "deleted": removed }));
                }
                if removed {
                    println!("Deleted {}", id);
                } else {
                    println!("No document {}", id);
                }
            }
            DocsAction::Stats => {
                let stats = store.stats();
                if self.json {
                    return print_json(&stats);
                }
                println!("Documents: {}", stats.document_count);
                for (category, count) in &stats.categories {
                    println!("  {:<12} {}", category, count);
                }
                println!("Storage: {} bytes at {}", stats.storage_bytes, store.path().display());
                if let Some(modified) = stats.last_modified {
                    println!("Last modified: {}", modified.to_rfc3339());
                }
            }
        }

        Ok(())
    }
}

fn print_document(document: &Document) {
    println!("{} ({})", document.title, document.id);
    println!("Category: {}", document.category);
    if let Some(location) = document.location() {
        println!("Location: {}", location);
    }
    if !document.tags.is_empty() {
        println!("Tags: {}", document.tags.join(", "));
    }
    println!();
    println!("{}", document.content);
}
