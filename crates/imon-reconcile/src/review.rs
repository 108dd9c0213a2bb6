use std::collections::BTreeSet;

use imon_schemas::{ReconciledRow, StockStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub critical: usize,
    pub low: usize,
    pub ok: usize,
    pub not_found: usize,
}

impl StatusSummary {
    pub fn count(&self, status: StockStatus) -> usize {
        match status {
            StockStatus::Critical => self.critical,
            StockStatus::Low => self.low,
            StockStatus::Ok => self.ok,
            StockStatus::NotFound => self.not_found,
        }
    }
}

pub fn summarize(rows: &[ReconciledRow]) -> StatusSummary {
    let mut s = StatusSummary {
        total: rows.len(),
        ..StatusSummary::default()
    };
    for r in rows {
        match r.status {
            StockStatus::Critical => s.critical += 1,
            StockStatus::Low => s.low += 1,
            StockStatus::Ok => s.ok += 1,
            StockStatus::NotFound => s.not_found += 1,
        }
    }
    s
}

/// Review filter: a status set plus an optional free-text search.
///
/// The default keeps the shortage list (`Critical` and `Low`) with no search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub statuses: BTreeSet<StockStatus>,
    /// Case-insensitive substring matched against key or display name.
    pub search: Option<String>,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self {
            statuses: [StockStatus::Critical, StockStatus::Low].into_iter().collect(),
            search: None,
        }
    }
}

impl RowFilter {
    pub fn all() -> Self {
        Self {
            statuses: StockStatus::ALL.into_iter().collect(),
            search: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let s = search.into();
        self.search = if s.trim().is_empty() { None } else { Some(s) };
        self
    }

    pub fn matches(&self, row: &ReconciledRow) -> bool {
        if !self.statuses.contains(&row.status) {
            return false;
        }
        match &self.search {
            None => true,
            Some(q) => {
                let q = q.trim().to_lowercase();
                row.key.to_lowercase().contains(&q) || row.display_name.to_lowercase().contains(&q)
            }
        }
    }
}

/// Rows passing `filter`, order preserved.
pub fn filter_rows<'a>(rows: &'a [ReconciledRow], filter: &RowFilter) -> Vec<&'a ReconciledRow> {
    rows.iter().filter(|r| filter.matches(r)).collect()
}
