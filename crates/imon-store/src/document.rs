use std::fmt;

use imon_schemas::table::TableRow;
use serde::{Deserialize, Serialize};

/// Everything a namespace holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Header row followed by data rows.
    pub table: Vec<TableRow>,
    /// Ordered `(key, value)` metadata rows.
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug)]
pub enum StoreError {
    /// The backing store could not be reached or written.
    Unavailable(String),
    /// The namespace holds something that is not a document.
    Corrupt { namespace: String, message: String },
    /// The namespace name is not safe for this backend.
    InvalidNamespace(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "document store unavailable: {msg}"),
            StoreError::Corrupt { namespace, message } => {
                write!(f, "document '{namespace}' is corrupt: {message}")
            }
            StoreError::InvalidNamespace(ns) => write!(f, "invalid namespace '{ns}'"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Document-store boundary.
///
/// `write` replaces the namespace wholesale; a reader sees either the old or
/// the new document, never a mix. `read` returns `Ok(None)` for a namespace
/// that was never written.
pub trait DocumentStore: Send + Sync {
    fn write(&self, namespace: &str, doc: &StoredDocument) -> Result<(), StoreError>;

    fn read(&self, namespace: &str) -> Result<Option<StoredDocument>, StoreError>;
}
