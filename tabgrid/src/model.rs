//! Table model: rows, cells, and table-level view state.

use crate::detect::{self, ColumnType, TypeMemo};

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort: which column and which direction. The absence of a
/// `SortState` means the table is in original order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// A single cell's text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A body row: its cells plus the position it held before any sort.
#[derive(Debug, Clone)]
pub struct Row {
    pub(crate) cells: Vec<Cell>,
    /// Assigned once by [`Table::number_rows`], never recomputed.
    pub(crate) index: Option<usize>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, index: None }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The row's position before any sort was applied.
    pub fn original_index(&self) -> Option<usize> {
        self.index
    }

    /// Text of the cell in `column`, or the empty string when the row is
    /// shorter than that.
    pub fn cell_text(&self, column: usize) -> &str {
        self.cells.get(column).map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// An in-memory table: optional header row, body rows, and the session
/// state that used to live in DOM attributes (sort column/direction and
/// wrap mode), plus the per-column type memo.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) header: Option<Vec<Cell>>,
    pub(crate) rows: Vec<Row>,
    pub(crate) sort: Option<SortState>,
    pub(crate) wrap: bool,
    pub(crate) types: TypeMemo,
}

impl Table {
    /// Build a table from raw strings. Rows stay unindexed until a sort
    /// first needs the original order.
    pub fn new(header: Option<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        Self {
            header: header.map(|cells| cells.into_iter().map(Cell::new).collect()),
            rows: rows
                .into_iter()
                .map(|cells| Row::new(cells.into_iter().map(Cell::new).collect()))
                .collect(),
            sort: None,
            wrap: false,
            types: TypeMemo::new(),
        }
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Whether wrap mode is on.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Number of columns, taken from the header when present, else from
    /// the first body row.
    pub fn column_count(&self) -> usize {
        self.header
            .as_ref()
            .map(|h| h.len())
            .or_else(|| self.rows.first().map(|r| r.cells.len()))
            .unwrap_or(0)
    }

    /// Assign original-order indexes to all rows, once. A first row that
    /// already carries an index means the pass has run; nothing is ever
    /// reassigned.
    pub fn number_rows(&mut self) {
        if self.rows.first().is_some_and(|r| r.index.is_some()) {
            return;
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.index = Some(i);
        }
    }

    /// Detected type for `column`, memoized for the life of this table.
    /// Cell edits after the first detection do not change the answer.
    pub fn column_type(&mut self, column: usize) -> ColumnType {
        if let Some(ty) = self.types.get(column) {
            return ty;
        }
        let ty = detect::detect_column(&self.rows, column);
        self.types.insert(column, ty);
        ty
    }
}
