//! imon-upload
//!
//! Read side of the minimum-stock upload: header aliasing, row normalization
//! and a CSV reader. Persisting the result is the caller's job.
//!
//! ## Column contract (case-insensitive, whitespace-trimmed, order-independent)
//!
//! | Logical column     | Accepted headers                                                    |
//! |--------------------|---------------------------------------------------------------------|
//! | `key`              | referencia, ref, codigo, código                                     |
//! | `display_name`     | nombre, producto, descripcion, descripción                          |
//! | `minimum_quantity` | inventario_minimo, inventario minimo, inventario mínimo, inventario minimo por gramos, inventario mínimo por gramos, minimo, mínimo, min, stock_minimo, stock minimo |
//!
//! All three must resolve or the upload is rejected wholesale.

pub mod aliases;
pub mod reader;

use std::collections::HashSet;
use std::fmt;

use imon_schemas::table::TableRow;
use imon_schemas::{parse_quantity, MinimumStockRecord};
use tracing::warn;

pub use aliases::{normalize_header, HeaderAliases, LogicalColumn};
pub use reader::{load_minimum_stock_csv, read_csv_file, read_csv_str, UploadError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// The header row does not resolve every required logical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumnsError {
    /// Every unresolved logical column, in contract order.
    pub missing: Vec<LogicalColumn>,
}

impl fmt::Display for MissingColumnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|c| c.as_str()).collect();
        write!(f, "missing required columns: {}", names.join(", "))
    }
}

impl std::error::Error for MissingColumnsError {}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A normalized minimum-stock list plus what was discarded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumStockUpload {
    pub records: Vec<MinimumStockRecord>,
    /// Data rows dropped because their key was blank.
    pub skipped_blank_keys: usize,
    /// Keys seen more than once; only the first occurrence was kept.
    pub duplicate_keys: Vec<String>,
}

/// Column positions of the three logical columns in one header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    key: usize,
    display_name: usize,
    minimum_quantity: usize,
}

fn resolve_columns(header: &[String], aliases: &HeaderAliases) -> Result<ColumnIndex, MissingColumnsError> {
    let find = |col: LogicalColumn| {
        header
            .iter()
            .position(|h| aliases.resolve(h) == Some(col))
    };

    let key = find(LogicalColumn::Key);
    let display_name = find(LogicalColumn::DisplayName);
    let minimum_quantity = find(LogicalColumn::MinimumQuantity);

    match (key, display_name, minimum_quantity) {
        (Some(key), Some(display_name), Some(minimum_quantity)) => Ok(ColumnIndex {
            key,
            display_name,
            minimum_quantity,
        }),
        _ => {
            let missing = [
                (LogicalColumn::Key, key),
                (LogicalColumn::DisplayName, display_name),
                (LogicalColumn::MinimumQuantity, minimum_quantity),
            ]
            .into_iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(col, _)| col)
            .collect();
            Err(MissingColumnsError { missing })
        }
    }
}

/// Normalize a header row + data rows into minimum-stock records.
///
/// - Header cells are matched through `aliases` after trim + lowercase.
/// - Non-numeric minimum quantities become `0`; the row is kept.
/// - Blank keys are skipped; repeated keys keep their first occurrence.
/// - Fully blank rows are ignored.
pub fn normalize_minimum_stock(
    rows: &[TableRow],
    aliases: &HeaderAliases,
) -> Result<MinimumStockUpload, MissingColumnsError> {
    let Some((header, data)) = rows.split_first() else {
        return Err(MissingColumnsError {
            missing: LogicalColumn::REQUIRED.to_vec(),
        });
    };
    let idx = resolve_columns(header, aliases)?;

    let cell = |row: &TableRow, i: usize| row.get(i).map(|s| s.trim()).unwrap_or("").to_string();

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = MinimumStockUpload {
        records: Vec::with_capacity(data.len()),
        skipped_blank_keys: 0,
        duplicate_keys: Vec::new(),
    };

    for row in data {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let key = cell(row, idx.key);
        if key.is_empty() {
            out.skipped_blank_keys += 1;
            continue;
        }
        if !seen.insert(key.clone()) {
            if !out.duplicate_keys.contains(&key) {
                out.duplicate_keys.push(key);
            }
            continue;
        }

        let minimum = parse_quantity(&cell(row, idx.minimum_quantity));
        out.records
            .push(MinimumStockRecord::new(key, cell(row, idx.display_name), minimum));
    }

    if !out.duplicate_keys.is_empty() {
        warn!(
            duplicates = out.duplicate_keys.len(),
            "minimum-stock upload repeats keys; first occurrence kept"
        );
    }

    Ok(out)
}
