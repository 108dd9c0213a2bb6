//! imon-schemas
//!
//! Shared record shapes for the inventory monitor. Every other `imon-*` crate
//! speaks in these types; none of them carry IO.
//!
//! Quantities are `f64` because minimum-stock lists are kept in grams and the
//! remote catalog reports fractional stock. All quantity constructors clamp to
//! `>= 0` so downstream code never has to re-check the sign.

pub mod table;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One line of a user's minimum-stock list.
///
/// Keys are unique within one list. A list is immutable once loaded into a
/// session and is replaced wholesale on re-upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumStockRecord {
    /// Business reference, trimmed and non-empty.
    pub key: String,
    pub display_name: String,
    pub minimum_quantity: f64,
}

impl MinimumStockRecord {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, minimum_quantity: f64) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            minimum_quantity: clamp_quantity(minimum_quantity),
        }
    }
}

/// One product of the remote catalog after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteStockRecord {
    pub key: String,
    pub display_name: String,
    pub current_quantity: f64,
}

impl RemoteStockRecord {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, current_quantity: f64) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            current_quantity: clamp_quantity(current_quantity),
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

/// Urgency class assigned to every reconciled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Critical,
    Low,
    Ok,
    NotFound,
}

impl StockStatus {
    pub const ALL: [StockStatus; 4] = [
        StockStatus::Critical,
        StockStatus::Low,
        StockStatus::Ok,
        StockStatus::NotFound,
    ];

    /// Stable machine identifier (CLI flags, CSV export).
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "CRITICAL",
            StockStatus::Low => "LOW",
            StockStatus::Ok => "OK",
            StockStatus::NotFound => "NOT_FOUND",
        }
    }

    /// Human label for printed reports.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical",
            StockStatus::Low => "Low",
            StockStatus::Ok => "OK",
            StockStatus::NotFound => "Not found in catalog",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "critical" => Some(StockStatus::Critical),
            "low" => Some(StockStatus::Low),
            "ok" => Some(StockStatus::Ok),
            "not_found" | "notfound" | "missing" => Some(StockStatus::NotFound),
            _ => None,
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A minimum-stock line joined against the catalog.
///
/// Derived on every reconciliation call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub key: String,
    pub display_name: String,
    pub minimum_quantity: f64,
    pub current_quantity: f64,
    /// `current_quantity - minimum_quantity`
    pub delta: f64,
    pub found: bool,
    pub status: StockStatus,
}

// ---------------------------------------------------------------------------
// Quantity helpers
// ---------------------------------------------------------------------------

/// Force a quantity into the `>= 0`, finite domain.
pub fn clamp_quantity(q: f64) -> f64 {
    if q.is_finite() && q > 0.0 {
        q
    } else {
        0.0
    }
}

/// Coerce free text into a quantity. Anything non-numeric becomes `0`.
///
/// Accepts a decimal comma (`"12,5"`) when it is the only separator, since
/// uploaded sheets are frequently exported with a Spanish locale.
pub fn parse_quantity(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    let parsed = t.parse::<f64>().ok().or_else(|| {
        if t.contains(',') && !t.contains('.') {
            t.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    });
    clamp_quantity(parsed.unwrap_or(0.0))
}

/// Render a quantity for table storage. Whole numbers carry no fractional part.
pub fn format_quantity(q: f64) -> String {
    format!("{}", clamp_quantity(q))
}

/// Decimal places kept when printing a signed difference.
pub const DELTA_DECIMALS: i32 = 6;

/// Signed counterpart of [`format_quantity`] for `current - minimum`.
/// Rounds away float noise; `-0` prints as `0`.
pub fn format_delta(d: f64) -> String {
    if !d.is_finite() {
        return "0".to_string();
    }
    let scale = 10f64.powi(DELTA_DECIMALS);
    let rounded = (d * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}
