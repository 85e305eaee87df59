//! Sorting: the direction state machine and row reordering.

use std::cmp::Ordering;

use log::debug;

use crate::detect::ColumnType;
use crate::model::{SortDirection, SortState, Table};

impl Table {
    /// Handle a sort request for `column`.
    ///
    /// Repeated requests on one column cycle ascending → descending →
    /// original order; a request for a different column always starts
    /// ascending. Rows are reordered in place and the new state is stored
    /// on the table and returned (`None` = original order restored).
    pub fn sort_by(&mut self, column: usize) -> Option<SortState> {
        self.number_rows();
        let ty = self.column_type(column);
        let next = next_state(self.sort, column);
        debug!("sort column {column} ({ty:?}) -> {next:?}");

        match next {
            None => {
                self.rows
                    .sort_by(|a, b| a.original_index().cmp(&b.original_index()));
            }
            Some(SortState { direction, .. }) => {
                let descending = direction == SortDirection::Descending;
                self.rows.sort_by(|a, b| {
                    // Descending swaps the operands rather than reversing
                    // the ordering; ties always fall back to the original
                    // index, ascending.
                    let (x, y) = if descending { (b, a) } else { (a, b) };
                    compare_cells(x.cell_text(column), y.cell_text(column), ty)
                        .then_with(|| a.original_index().cmp(&b.original_index()))
                });
            }
        }

        self.sort = next;
        next
    }
}

/// Next sort state after a request for `clicked`, given the current one.
fn next_state(current: Option<SortState>, clicked: usize) -> Option<SortState> {
    match current {
        Some(SortState { column, direction }) if column == clicked => match direction {
            SortDirection::Ascending => Some(SortState {
                column: clicked,
                direction: SortDirection::Descending,
            }),
            SortDirection::Descending => None,
        },
        _ => Some(SortState {
            column: clicked,
            direction: SortDirection::Ascending,
        }),
    }
}

fn compare_cells(a: &str, b: &str, ty: ColumnType) -> Ordering {
    match ty {
        ColumnType::Numeric => {
            let left = a.parse::<f64>().unwrap_or(0.0);
            let right = b.parse::<f64>().unwrap_or(0.0);
            left.total_cmp(&right)
        }
        ColumnType::Text => compare_text(a, b),
    }
}

/// Case-insensitive comparison, code-point order as the tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
