//! Worksheet-style table codecs.
//!
//! Records are persisted as a header row followed by data rows, every cell a
//! string. The header names written here are also accepted by the upload
//! alias table, so a stored minimum-stock list can be fed back through the
//! same normalizer that reads a fresh upload.

use crate::{
    format_quantity, parse_quantity, MinimumStockRecord, RemoteStockRecord,
};

pub type TableRow = Vec<String>;

/// Header written for a stored minimum-stock list.
pub const MINIMUM_STOCK_HEADER: [&str; 3] = ["referencia", "nombre", "inventario_minimo"];

/// Header written for the stored catalog snapshot.
pub const REMOTE_STOCK_HEADER: [&str; 3] = ["code", "name", "current_quantity"];

pub fn minimum_stock_to_rows(records: &[MinimumStockRecord]) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(MINIMUM_STOCK_HEADER.iter().map(|s| s.to_string()).collect());
    for r in records {
        rows.push(vec![
            r.key.clone(),
            r.display_name.clone(),
            format_quantity(r.minimum_quantity),
        ]);
    }
    rows
}

pub fn remote_stock_to_rows(records: &[RemoteStockRecord]) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(REMOTE_STOCK_HEADER.iter().map(|s| s.to_string()).collect());
    for r in records {
        rows.push(vec![
            r.key.clone(),
            r.display_name.clone(),
            format_quantity(r.current_quantity),
        ]);
    }
    rows
}

/// Decode a stored catalog snapshot.
///
/// Columns are located by header name, so reordering in the store is
/// tolerated. Returns `None` when the header does not carry all three
/// columns. Rows with an empty key or name are skipped, matching the remote
/// normalizer.
pub fn remote_stock_from_rows(rows: &[TableRow]) -> Option<Vec<RemoteStockRecord>> {
    let (header, data) = rows.split_first()?;
    let idx = |name: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let key_i = idx(REMOTE_STOCK_HEADER[0])?;
    let name_i = idx(REMOTE_STOCK_HEADER[1])?;
    let qty_i = idx(REMOTE_STOCK_HEADER[2])?;

    fn cell(row: &TableRow, i: usize) -> &str {
        row.get(i).map(|s| s.trim()).unwrap_or("")
    }

    let out = data
        .iter()
        .filter_map(|row| {
            let key = cell(row, key_i);
            let name = cell(row, name_i);
            if key.is_empty() || name.is_empty() {
                return None;
            }
            Some(RemoteStockRecord::new(key, name, parse_quantity(cell(row, qty_i))))
        })
        .collect();
    Some(out)
}
