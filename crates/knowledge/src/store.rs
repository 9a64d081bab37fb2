//! Persistent document store.
//!
//! The whole collection lives in memory behind a `RwLock` and is mirrored to
//! `<data_dir>/documents.json`. Every mutation builds the next collection,
//! writes it to disk while holding the write lock, and only then swaps it in,
//! so a failed write leaves both memory and disk at the previous state.

use crate::scoring::rank;
use crate::seed::seed_documents;
use crate::types::{Document, ScoredDocument, StoreStats};
use chrono::{DateTime, Utc};
use serpico_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// File holding the serialized collection inside the data directory.
pub const DOCUMENTS_FILE: &str = "documents.json";

/// Prefix for generated document ids.
pub const ID_PREFIX: &str = "rag-";

/// Source of ranked documents for a query.
pub trait Retriever: Send + Sync {
    /// Return at most `limit` documents with a positive score, best first.
    fn retrieve(&self, query: &str, limit: usize) -> Vec<ScoredDocument>;
}

/// JSON-file backed document collection.
pub struct DocumentStore {
    path: PathBuf,
    documents: RwLock<Vec<Document>>,
}

impl DocumentStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// A missing or empty file is seeded with the built-in corpus and
    /// written back. An existing collection is never re-seeded, even when
    /// it holds no documents.
    pub fn load(data_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create data directory {:?}: {}",
                data_dir, e
            ))
        })?;

        let path = data_dir.join(DOCUMENTS_FILE);
        let existing = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => None,
            Ok(bytes) => Some(serde_json::from_slice::<Vec<Document>>(&bytes).map_err(|e| {
                AppError::Storage(format!("Failed to parse {:?}: {}", path, e))
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {:?}: {}",
                    path, e
                )))
            }
        };

        let documents = match existing {
            Some(documents) => {
                tracing::info!("Loaded {} documents from {:?}", documents.len(), path);
                documents
            }
            None => {
                let documents = seed_documents();
                write_collection(&path, &documents)?;
                tracing::info!("Seeded {} documents into {:?}", documents.len(), path);
                documents
            }
        };

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rank documents against `query`. A `limit` of 0 means the default.
    pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredDocument> {
        let results = rank(query, &self.read(), limit);
        tracing::debug!("Search {:?} matched {} documents", query, results.len());
        results
    }

    /// Add a document, assigning a fresh id when none is given.
    pub fn add(&self, mut document: Document) -> AppResult<Document> {
        if document.id.trim().is_empty() {
            document.id = generate_id();
        }

        let mut documents = self.write();
        if documents.iter().any(|d| d.id == document.id) {
            return Err(AppError::Knowledge(format!(
                "Document {} already exists",
                document.id
            )));
        }

        let mut next = documents.clone();
        next.push(document.clone());
        self.commit(&mut documents, next)?;

        tracing::info!("Added document {}", document.id);
        Ok(document)
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> Option<Document> {
        self.read().iter().find(|d| d.id == id).cloned()
    }

    /// Snapshot of every document in collection order.
    pub fn all(&self) -> Vec<Document> {
        self.read().clone()
    }

    /// Replace the document with `id`, keeping its id and position.
    ///
    /// Returns `Ok(None)` without touching storage when no document matches.
    pub fn update(&self, id: &str, replacement: Document) -> AppResult<Option<Document>> {
        let mut documents = self.write();
        let Some(position) = documents.iter().position(|d| d.id == id) else {
            return Ok(None);
        };

        let updated = Document {
            id: id.to_string(),
            ..replacement
        };
        let mut next = documents.clone();
        next[position] = updated.clone();
        self.commit(&mut documents, next)?;

        tracing::info!("Updated document {}", id);
        Ok(Some(updated))
    }

    /// Remove the document with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> AppResult<bool> {
        let mut documents = self.write();
        if !documents.iter().any(|d| d.id == id) {
            return Ok(false);
        }

        let next: Vec<Document> = documents.iter().filter(|d| d.id != id).cloned().collect();
        self.commit(&mut documents, next)?;

        tracing::info!("Deleted document {}", id);
        Ok(true)
    }

    /// Collection summary with on-disk size and modification time.
    pub fn stats(&self) -> StoreStats {
        let documents = self.read();

        let mut categories = BTreeMap::new();
        for document in documents.iter() {
            *categories.entry(document.category.clone()).or_insert(0) += 1;
        }

        let metadata = fs::metadata(&self.path).ok();
        let storage_bytes = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
        let last_modified = metadata
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        StoreStats {
            document_count: documents.len(),
            categories,
            storage_bytes,
            last_modified,
        }
    }

    fn commit(
        &self,
        current: &mut RwLockWriteGuard<'_, Vec<Document>>,
        next: Vec<Document>,
    ) -> AppResult<()> {
        write_collection(&self.path, &next)?;
        **current = next;
        Ok(())
    }

    // A panic can only happen before the swap, so a poisoned lock still
    // guards a consistent collection.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Document>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Document>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Retriever for DocumentStore {
    fn retrieve(&self, query: &str, limit: usize) -> Vec<ScoredDocument> {
        self.search(query, limit)
    }
}

fn generate_id() -> String {
    format!("{}{}", ID_PREFIX, uuid::Uuid::new_v4())
}

/// Write the collection as indented JSON through a sibling temp file.
fn write_collection(path: &Path, documents: &[Document]) -> AppResult<()> {
    let json = serde_json::to_vec_pretty(documents)
        .map_err(|e| AppError::Storage(format!("Failed to serialize documents: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .map_err(|e| AppError::Storage(format!("Failed to write {:?}: {}", tmp_path, e)))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        AppError::Storage(format!("Failed to replace {:?}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn open() -> (TempDir, DocumentStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::load(&temp_dir.path().join("rag")).unwrap();
        (temp_dir, store)
    }

    /// Make every later write fail by putting a regular file where the
    /// data directory was.
    fn break_storage(temp_dir: &TempDir) {
        let data_dir = temp_dir.path().join("rag");
        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, "not a directory").unwrap();
    }

    #[test]
    fn test_first_load_seeds_and_persists() {
        let (_temp_dir, store) = open();

        assert_eq!(store.all().len(), 10);
        assert!(store.path().exists());

        let on_disk: Vec<Document> =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, store.all());
    }

    #[test]
    fn test_reload_does_not_reseed() {
        let (temp_dir, store) = open();
        store.add(Document::new("Extra", "Body", "history")).unwrap();
        drop(store);

        let reopened = DocumentStore::load(&temp_dir.path().join("rag")).unwrap();
        assert_eq!(reopened.all().len(), 11);
    }

    #[test]
    fn test_empty_collection_stays_empty() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("rag");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(DOCUMENTS_FILE), "[]").unwrap();

        let store = DocumentStore::load(&data_dir).unwrap();
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_empty_file_is_seeded() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("rag");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(DOCUMENTS_FILE), "").unwrap();

        let store = DocumentStore::load(&data_dir).unwrap();
        assert_eq!(store.all().len(), 10);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("rag");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(DOCUMENTS_FILE), "{not json").unwrap();

        let err = DocumentStore::load(&data_dir).err().unwrap();
        assert!(err.is_storage());
    }

    #[test]
    fn test_unusable_data_dir_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = DocumentStore::load(&blocker.join("rag")).err().unwrap();
        assert!(err.is_storage());
    }

    #[test]
    fn test_add_then_get_round_trip() {
        let (_temp_dir, store) = open();
        let added = store
            .add(
                Document::new("Night Patrol Notes", "Extra units after 10 PM", "strategy")
                    .with_location("Olathe, KS")
                    .with_tags(["patrol", "night"]),
            )
            .unwrap();

        assert!(added.id.starts_with(ID_PREFIX));
        assert_eq!(store.get(&added.id), Some(added.clone()));
        assert_eq!(store.all().last(), Some(&added));
    }

    #[test]
    fn test_add_keeps_explicit_id_and_rejects_duplicates() {
        let (_temp_dir, store) = open();
        let added = store
            .add(Document::new("T", "C", "history").with_id("custom-1"))
            .unwrap();
        assert_eq!(added.id, "custom-1");

        let err = store
            .add(Document::new("Other", "C", "history").with_id("rag-001"))
            .unwrap_err();
        assert!(matches!(err, AppError::Knowledge(_)));
        assert_eq!(store.all().len(), 11);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let (_temp_dir, store) = open();
        let a = store.add(Document::new("A", "a", "x")).unwrap();
        let b = store.add(Document::new("B", "b", "x")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let (_temp_dir, store) = open();
        let replacement = Document::new("Revised", "New body", "strategy").with_id("rag-999");

        let updated = store.update("rag-004", replacement).unwrap().unwrap();
        assert_eq!(updated.id, "rag-004");
        assert_eq!(updated.title, "Revised");
        assert!(store.get("rag-999").is_none());
        assert_eq!(store.all()[3], updated);
    }

    #[test]
    fn test_update_missing_is_none() {
        let (_temp_dir, store) = open();
        let before = fs::read(store.path()).unwrap();

        let result = store
            .update("rag-404", Document::new("T", "C", "x"))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_temp_dir, store) = open();

        assert!(store.delete("rag-002").unwrap());
        assert!(store.get("rag-002").is_none());
        assert!(!store.delete("rag-002").unwrap());
        assert_eq!(store.all().len(), 9);
    }

    #[test]
    fn test_failed_add_rolls_back() {
        let (temp_dir, store) = open();
        break_storage(&temp_dir);

        let err = store.add(Document::new("Lost", "C", "x")).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.all().len(), 10);
    }

    #[test]
    fn test_failed_update_and_delete_roll_back() {
        let (temp_dir, store) = open();
        let original = store.get("rag-001").unwrap();
        break_storage(&temp_dir);

        assert!(store
            .update("rag-001", Document::new("Changed", "C", "x"))
            .unwrap_err()
            .is_storage());
        assert_eq!(store.get("rag-001"), Some(original));

        assert!(store.delete("rag-001").unwrap_err().is_storage());
        assert!(store.get("rag-001").is_some());
    }

    #[test]
    fn test_stats() {
        let (_temp_dir, store) = open();
        let stats = store.stats();

        assert_eq!(stats.document_count, 10);
        assert_eq!(stats.categories.get("strategy"), Some(&3));
        assert_eq!(stats.categories.get("history"), Some(&3));
        assert_eq!(stats.categories.get("locations"), Some(&2));
        assert!(stats.storage_bytes > 0);
        assert!(stats.last_modified.is_some());
    }

    #[test]
    fn test_search_respects_limit_and_order() {
        let (_temp_dir, store) = open();

        let results = store.search("olathe pursuit strategy", 3);
        assert_eq!(results.len(), 3);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

        assert!(store.search("zzzz", 5).is_empty());
    }

    #[test]
    fn test_readers_only_see_committed_states() {
        const WRITES: usize = 20;

        let (_temp_dir, store) = open();
        let store = Arc::new(store);
        let seed_ids: Vec<String> = store.all().into_iter().map(|d| d.id).collect();
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                let seed_ids = seed_ids.clone();
                thread::spawn(move || {
                    let mut snapshots = 0;
                    loop {
                        // One writer adds load-00.. in order, then deletes
                        // them in order: every committed state is the seed
                        // corpus followed by a contiguous run of additions.
                        let ids: Vec<String> = store.all().into_iter().map(|d| d.id).collect();
                        assert!(ids.len() <= seed_ids.len() + WRITES);
                        assert_eq!(&ids[..seed_ids.len()], seed_ids.as_slice());
                        let added: Vec<usize> = ids[seed_ids.len()..]
                            .iter()
                            .map(|id| id.trim_start_matches("load-").parse().unwrap())
                            .collect();
                        assert!(added.windows(2).all(|w| w[1] == w[0] + 1), "{:?}", added);

                        assert!(store.search("pursuit", 3).len() <= 3);
                        snapshots += 1;

                        if done.load(Ordering::SeqCst) {
                            return snapshots;
                        }
                    }
                })
            })
            .collect();

        for i in 0..WRITES {
            let document =
                Document::new("Load", "pursuit load", "test").with_id(format!("load-{:02}", i));
            store.add(document).unwrap();
        }
        for i in 0..WRITES {
            assert!(store.delete(&format!("load-{:02}", i)).unwrap());
        }
        done.store(true, Ordering::SeqCst);

        for reader in readers {
            assert!(reader.join().unwrap() > 0);
        }

        let on_disk: Vec<Document> =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, store.all());
        assert_eq!(store.all().len(), seed_ids.len());
    }
}
