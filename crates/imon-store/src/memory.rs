use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::document::{DocumentStore, StoreError, StoredDocument};

/// In-process store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<HashMap<String, StoredDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> Vec<String> {
        let docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<String> = docs.keys().cloned().collect();
        out.sort();
        out
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn write(&self, namespace: &str, doc: &StoredDocument) -> Result<(), StoreError> {
        let mut docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        docs.insert(namespace.to_string(), doc.clone());
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<StoredDocument>, StoreError> {
        let docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.get(namespace).cloned())
    }
}
