//! Column width measurement and fair-share allocation.

use crate::model::Table;
use crate::text::display_width;

/// Maximum content width per column, the header cell included.
pub fn measure(table: &Table) -> Vec<usize> {
    let columns = table.column_count();
    let mut content = vec![0usize; columns];
    if let Some(header) = table.header() {
        for (i, cell) in header.iter().enumerate().take(columns) {
            content[i] = content[i].max(display_width(&cell.text));
        }
    }
    for row in table.rows() {
        for (i, cell) in row.cells().iter().enumerate().take(columns) {
            content[i] = content[i].max(display_width(&cell.text));
        }
    }
    content
}

/// Distribute `available` columns of space across columns with the given
/// content widths.
///
/// Each column's fair share is an even split of `available`. Columns are
/// processed narrowest first: a column that fits inside the fair share is
/// awarded exactly its content width and cedes the surplus to a shared
/// pool; a wider column may exceed the fair share by its even split of
/// the pool (counting itself among the columns still waiting), and never
/// past its own content width. The awarded total never exceeds
/// `available`.
pub fn allocate(content: &[usize], available: usize) -> Vec<usize> {
    let n = content.len();
    if n == 0 {
        return Vec::new();
    }
    let fair_share = available / n;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| content[i]);

    let mut widths = vec![0usize; n];
    let mut pool = 0usize;
    for (processed, &col) in order.iter().enumerate() {
        let remaining = n - processed;
        let want = content[col];
        if want <= fair_share {
            widths[col] = want;
            pool += fair_share - want;
        } else {
            let growth = (pool / remaining).min(want - fair_share);
            widths[col] = fair_share + growth;
            pool -= growth;
        }
    }
    widths
}
