//! imon-store
//!
//! Persistence for the inventory monitor, split in two layers:
//!
//! - [`DocumentStore`]: a key-value document store with worksheet-like
//!   namespaces. Each namespace holds one table (header + data rows) and a
//!   small list of metadata rows. Writes replace the whole document.
//! - [`SharedCache`]: the staleness policy on top. Reads degrade to a miss on
//!   any store failure; writes degrade to "not saved".
//!
//! Namespaces are chosen here, not by callers: one per user for the
//! minimum-stock list, one shared name for the catalog snapshot.

mod cache;
mod document;
mod fs;
mod memory;

pub use cache::{
    CacheEntry, CacheUnavailable, SharedCache, DEFAULT_MAX_AGE_HOURS, LAST_UPDATED_KEY,
};
pub use document::{DocumentStore, StoreError, StoredDocument};
pub use fs::FsDocumentStore;
pub use memory::MemoryDocumentStore;

/// Process-wide namespace of the remote catalog snapshot.
pub const CATALOG_NAMESPACE: &str = "catalog_snapshot";

/// Metadata key carrying the raw product count of a catalog snapshot.
pub const TOTAL_PRODUCTS_KEY: &str = "total_products";

/// Namespace of one user's minimum-stock list.
///
/// Built from the local part of the user's e-mail, lowercased, with anything
/// outside `[a-z0-9._-]` replaced by `_`.
pub fn minimum_stock_namespace(user: &str) -> String {
    let local = user.trim().split('@').next().unwrap_or("");
    let mut slug: String = local
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        slug.push_str("anonymous");
    }
    format!("minimum_stock_{slug}")
}
