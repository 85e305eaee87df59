//! Column type detection with a per-column memo.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Row;

/// A column is numeric only when every one of its cells matches this.
static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern compiles"));

/// Detected type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
}

/// Whether `text` reads as an integer or decimal number.
pub fn is_numeric_text(text: &str) -> bool {
    NUMERIC_PATTERN.is_match(text)
}

/// Scan every cell of `column` across `rows`; a single non-numeric cell
/// makes the whole column textual.
pub fn detect_column(rows: &[Row], column: usize) -> ColumnType {
    for row in rows {
        if !is_numeric_text(row.cell_text(column)) {
            return ColumnType::Text;
        }
    }
    ColumnType::Numeric
}

/// Per-column type memo, populated lazily. Entries are never invalidated
/// while the table is loaded; a reload builds a fresh table and with it a
/// fresh memo.
#[derive(Debug, Clone, Default)]
pub struct TypeMemo {
    types: HashMap<usize, ColumnType>,
}

impl TypeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: usize) -> Option<ColumnType> {
        self.types.get(&column).copied()
    }

    pub fn insert(&mut self, column: usize, ty: ColumnType) {
        self.types.insert(column, ty);
    }
}
