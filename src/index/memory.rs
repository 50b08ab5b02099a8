use super::traits::{IndexResult, IndexSink};
use crate::extract::Document;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process index sink keyed by document id
///
/// Used for dry runs and tests. Upserts overwrite earlier documents with the
/// same id, like the real index does.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Document>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the stored document with the given id
    pub fn get(&self, id: &str) -> Option<Document> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All stored documents, ordered by id
    pub fn documents(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self.lock().values().cloned().collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        documents
    }
}

#[async_trait]
impl IndexSink for MemorySink {
    async fn ensure_schema(&self) -> IndexResult<()> {
        Ok(())
    }

    async fn upsert_batch(&self, documents: &[Document]) -> IndexResult<usize> {
        let mut stored = self.lock();
        for document in documents {
            stored.insert(document.id.clone(), document.clone());
        }
        Ok(documents.len())
    }

    async fn reset(&self) -> IndexResult<()> {
        self.lock().clear();
        Ok(())
    }
}
