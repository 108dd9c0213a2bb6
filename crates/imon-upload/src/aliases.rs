//! Static header alias table.
//!
//! Free-text column names are mapped to logical columns by exact lookup after
//! [`normalize_header`]. No fuzzy or substring matching.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalColumn {
    Key,
    DisplayName,
    MinimumQuantity,
}

impl LogicalColumn {
    pub const REQUIRED: [LogicalColumn; 3] = [
        LogicalColumn::Key,
        LogicalColumn::DisplayName,
        LogicalColumn::MinimumQuantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalColumn::Key => "key",
            LogicalColumn::DisplayName => "display_name",
            LogicalColumn::MinimumQuantity => "minimum_quantity",
        }
    }
}

const STANDARD_ALIASES: &[(&str, LogicalColumn)] = &[
    ("referencia", LogicalColumn::Key),
    ("ref", LogicalColumn::Key),
    ("codigo", LogicalColumn::Key),
    ("código", LogicalColumn::Key),
    ("nombre", LogicalColumn::DisplayName),
    ("producto", LogicalColumn::DisplayName),
    ("descripcion", LogicalColumn::DisplayName),
    ("descripción", LogicalColumn::DisplayName),
    ("inventario_minimo", LogicalColumn::MinimumQuantity),
    ("inventario minimo", LogicalColumn::MinimumQuantity),
    ("inventario mínimo", LogicalColumn::MinimumQuantity),
    ("inventario minimo por gramos", LogicalColumn::MinimumQuantity),
    ("inventario mínimo por gramos", LogicalColumn::MinimumQuantity),
    ("minimo", LogicalColumn::MinimumQuantity),
    ("mínimo", LogicalColumn::MinimumQuantity),
    ("min", LogicalColumn::MinimumQuantity),
    ("stock_minimo", LogicalColumn::MinimumQuantity),
    ("stock minimo", LogicalColumn::MinimumQuantity),
];

/// Trim, lowercase (Unicode-aware) and collapse inner whitespace runs.
pub fn normalize_header(h: &str) -> String {
    h.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone)]
pub struct HeaderAliases {
    map: HashMap<String, LogicalColumn>,
}

impl HeaderAliases {
    /// The alias table used for spreadsheet uploads.
    pub fn standard() -> Self {
        let map = STANDARD_ALIASES
            .iter()
            .map(|(alias, col)| (normalize_header(alias), *col))
            .collect();
        Self { map }
    }

    /// Add (or redirect) one alias.
    pub fn with_alias(mut self, alias: &str, col: LogicalColumn) -> Self {
        self.map.insert(normalize_header(alias), col);
        self
    }

    pub fn resolve(&self, header: &str) -> Option<LogicalColumn> {
        self.map.get(&normalize_header(header)).copied()
    }
}

impl Default for HeaderAliases {
    fn default() -> Self {
        Self::standard()
    }
}
