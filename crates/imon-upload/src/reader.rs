//! CSV reader for uploaded minimum-stock sheets.
//!
//! Produces raw string rows (header first). The delimiter is sniffed from the
//! header line: spreadsheets exported with a Spanish locale use `;`.

use std::fmt;
use std::path::Path;

use imon_schemas::table::TableRow;

use crate::{normalize_minimum_stock, HeaderAliases, MinimumStockUpload, MissingColumnsError};

#[derive(Debug)]
pub enum UploadError {
    /// The file could not be opened or read.
    Io(String),
    /// The CSV was structurally unreadable.
    Csv(String),
    /// The header row did not satisfy the column contract.
    MissingColumns(MissingColumnsError),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Io(msg) => write!(f, "upload io error: {msg}"),
            UploadError::Csv(msg) => write!(f, "upload csv error: {msg}"),
            UploadError::MissingColumns(e) => write!(f, "upload rejected: {e}"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<MissingColumnsError> for UploadError {
    fn from(e: MissingColumnsError) -> Self {
        UploadError::MissingColumns(e)
    }
}

fn sniff_delimiter(src: &str) -> u8 {
    let first = src.lines().next().unwrap_or("");
    let commas = first.matches(',').count();
    let semis = first.matches(';').count();
    if semis > commas {
        b';'
    } else {
        b','
    }
}

/// Parse CSV text into rows. A leading UTF-8 BOM is ignored.
pub fn read_csv_str(src: &str) -> Result<Vec<TableRow>, UploadError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(src))
        .from_reader(src.as_bytes());

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| UploadError::Csv(e.to_string()))?;
        rows.push(rec.iter().map(|c| c.to_string()).collect());
    }
    Ok(rows)
}

pub fn read_csv_file(path: &Path) -> Result<Vec<TableRow>, UploadError> {
    let bytes = std::fs::read(path)
        .map_err(|e| UploadError::Io(format!("read '{}': {e}", path.display())))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| UploadError::Io(format!("'{}' is not UTF-8 text", path.display())))?;
    read_csv_str(&text)
}

/// Read and normalize an uploaded CSV in one step.
pub fn load_minimum_stock_csv(
    path: &Path,
    aliases: &HeaderAliases,
) -> Result<MinimumStockUpload, UploadError> {
    let rows = read_csv_file(path)?;
    Ok(normalize_minimum_stock(&rows, aliases)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_sheets_are_detected() {
        let rows = read_csv_str("Ref;Producto;Mínimo\nA;Sal;10,5\n").unwrap();
        assert_eq!(rows[0], vec!["Ref", "Producto", "Mínimo"]);
        assert_eq!(rows[1], vec!["A", "Sal", "10,5"]);
    }

    #[test]
    fn quoted_commas_survive() {
        let rows = read_csv_str("ref,nombre,min\nA,\"Sal, fina\",3\n").unwrap();
        assert_eq!(rows[1][1], "Sal, fina");
    }

    #[test]
    fn bom_is_stripped() {
        let rows = read_csv_str("\u{feff}ref,nombre,min\n").unwrap();
        assert_eq!(rows[0][0], "ref");
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let rows = read_csv_str("ref,nombre,min\nA,Sal\n").unwrap();
        assert_eq!(rows[1].len(), 2);
    }
}
