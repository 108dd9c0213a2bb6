use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{DocumentStore, StoreError, StoredDocument};

/// One pretty-printed JSON file per namespace under a root directory.
///
/// Writes go to `<ns>.json.tmp` and are renamed into place.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &str) -> Result<PathBuf, StoreError> {
        let ok = !namespace.is_empty()
            && !namespace.starts_with('.')
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !ok {
            return Err(StoreError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.root.join(format!("{namespace}.json")))
    }
}

impl DocumentStore for FsDocumentStore {
    fn write(&self, namespace: &str, doc: &StoredDocument) -> Result<(), StoreError> {
        let path = self.path_for(namespace)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::Unavailable(format!("create dir {}: {e}", self.root.display()))
        })?;

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Unavailable(format!("encode '{namespace}': {e}")))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, format!("{json}\n"))
            .map_err(|e| StoreError::Unavailable(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StoreError::Unavailable(format!("rename {}: {e}", path.display())))?;
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<StoredDocument>, StoreError> {
        let path = self.path_for(namespace)?;
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };
        let doc = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            namespace: namespace.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(doc))
    }
}
