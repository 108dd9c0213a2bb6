use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use imon_schemas::table::TableRow;
use tracing::{debug, warn};

use crate::document::{DocumentStore, StoredDocument};

/// Metadata key under which every save records its write time.
pub const LAST_UPDATED_KEY: &str = "last_updated";

/// Default freshness window.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub namespace: String,
    /// Header row followed by data rows.
    pub rows: Vec<TableRow>,
    pub last_updated: DateTime<Utc>,
    /// Metadata other than the write timestamp.
    pub extra_metadata: BTreeMap<String, String>,
}

impl CacheEntry {
    /// Number of data rows (header excluded).
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_updated
    }
}

/// A save that did not land. Never fatal; callers surface it as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheUnavailable {
    pub namespace: String,
    pub message: String,
}

impl fmt::Display for CacheUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache unavailable, '{}' not saved: {}",
            self.namespace, self.message
        )
    }
}

impl std::error::Error for CacheUnavailable {}

/// Staleness policy over a [`DocumentStore`].
#[derive(Clone)]
pub struct SharedCache {
    store: Arc<dyn DocumentStore>,
}

impl fmt::Debug for SharedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache").finish_non_exhaustive()
    }
}

impl SharedCache {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn save(
        &self,
        namespace: &str,
        rows: &[TableRow],
        metadata: &[(&str, String)],
    ) -> Result<DateTime<Utc>, CacheUnavailable> {
        self.save_at(namespace, rows, metadata, Utc::now())
    }

    /// Overwrite `namespace` with `rows`, stamping `now` as the write time.
    ///
    /// A caller-supplied `last_updated` entry is replaced by the stamp.
    pub fn save_at(
        &self,
        namespace: &str,
        rows: &[TableRow],
        metadata: &[(&str, String)],
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, CacheUnavailable> {
        let mut meta = vec![(
            LAST_UPDATED_KEY.to_string(),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        )];
        meta.extend(
            metadata
                .iter()
                .filter(|(k, _)| *k != LAST_UPDATED_KEY)
                .map(|(k, v)| (k.to_string(), v.clone())),
        );

        let doc = StoredDocument {
            table: rows.to_vec(),
            metadata: meta,
        };

        match self.store.write(namespace, &doc) {
            Ok(()) => {
                debug!(namespace, rows = rows.len(), "cache saved");
                Ok(now)
            }
            Err(e) => {
                warn!(namespace, error = %e, "cache save failed");
                Err(CacheUnavailable {
                    namespace: namespace.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    pub fn load(&self, namespace: &str, max_age: Option<Duration>) -> Option<CacheEntry> {
        self.load_at(namespace, max_age, Utc::now())
    }

    /// Read `namespace` if it exists, carries a parseable timestamp and is no
    /// older than `max_age` at `now`. `None` disables the age check.
    ///
    /// Store failures are a miss.
    pub fn load_at(
        &self,
        namespace: &str,
        max_age: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        let doc = match self.store.read(namespace) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(namespace, "cache miss: absent");
                return None;
            }
            Err(e) => {
                warn!(namespace, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let mut last_updated = None;
        let mut extra_metadata = BTreeMap::new();
        for (k, v) in doc.metadata {
            if k == LAST_UPDATED_KEY {
                last_updated = parse_timestamp(&v);
            } else {
                extra_metadata.insert(k, v);
            }
        }

        let Some(last_updated) = last_updated else {
            debug!(namespace, "cache miss: no parseable timestamp");
            return None;
        };

        if let Some(max_age) = max_age {
            if now - last_updated > max_age {
                debug!(namespace, %last_updated, "cache miss: stale");
                return None;
            }
        }

        Some(CacheEntry {
            namespace: namespace.to_string(),
            rows: doc.table,
            last_updated,
            extra_metadata,
        })
    }
}

/// RFC 3339, or the naive `YYYY-MM-DD HH:MM:SS` form read as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|n| n.and_utc())
}
