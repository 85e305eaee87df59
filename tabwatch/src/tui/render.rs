//! Drawing the table into the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};

use tabgrid::model::{Cell, Row};
use tabgrid::text::{display_width, truncate_to_width};
use tabgrid::{SortState, Table, wrap};

/// Space between adjacent columns, in terminal cells.
pub const COLUMN_GAP: usize = 1;

/// Draw a full frame: header (when present) and the visible body rows.
pub fn draw(
    out: &mut impl Write,
    table: &mut Table,
    widths: &[usize],
    scroll: usize,
    size: (u16, u16),
) -> io::Result<()> {
    let term_h = size.1 as usize;
    let numeric: Vec<bool> = (0..widths.len())
        .map(|c| table.column_type(c).is_numeric())
        .collect();
    let sort = table.sort();

    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let mut y = 0usize;
    if let Some(header) = table.header() {
        draw_header(out, header, widths, &numeric, sort)?;
        y = 1;
    }

    if table.wrap() {
        for row in table.rows().iter().skip(scroll) {
            if y >= term_h {
                break;
            }
            y += draw_wrapped_row(out, row, widths, &numeric, y, term_h)?;
        }
    } else {
        for row in table.rows().iter().skip(scroll) {
            if y >= term_h {
                break;
            }
            draw_row(out, row, widths, &numeric, y as u16)?;
            y += 1;
        }
    }

    out.flush()
}

/// Map a click x position to the column under it, if any.
pub fn column_at_x(widths: &[usize], x: u16) -> Option<usize> {
    let x = x as usize;
    let mut start = 0usize;
    for (i, width) in widths.iter().enumerate() {
        let end = start + width;
        if x >= start && x < end {
            return Some(i);
        }
        start = end + COLUMN_GAP;
    }
    None
}

fn draw_header(
    out: &mut impl Write,
    header: &[Cell],
    widths: &[usize],
    numeric: &[bool],
    sort: Option<SortState>,
) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0), SetAttribute(Attribute::Bold))?;
    for (i, &width) in widths.iter().enumerate() {
        let text = header.get(i).map(|c| c.text.as_str()).unwrap_or("");
        let active = sort.is_some_and(|s| s.column == i);
        if active {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(out, Print(format_cell(text, width, numeric[i])))?;
        if active {
            queue!(out, SetAttribute(Attribute::NoUnderline))?;
        }
        if i + 1 < widths.len() {
            queue!(out, Print(" ".repeat(COLUMN_GAP)))?;
        }
    }
    queue!(out, SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn draw_row(
    out: &mut impl Write,
    row: &Row,
    widths: &[usize],
    numeric: &[bool],
    y: u16,
) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, y))?;
    for (i, &width) in widths.iter().enumerate() {
        queue!(out, Print(format_cell(row.cell_text(i), width, numeric[i])))?;
        if i + 1 < widths.len() {
            queue!(out, Print(" ".repeat(COLUMN_GAP)))?;
        }
    }
    Ok(())
}

/// Draw one row in wrap mode. Returns the number of terminal rows the
/// row occupies (the tallest cell).
fn draw_wrapped_row(
    out: &mut impl Write,
    row: &Row,
    widths: &[usize],
    numeric: &[bool],
    y: usize,
    term_h: usize,
) -> io::Result<usize> {
    let cells: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| wrap::break_lines(row.cell_text(i), width))
        .collect();
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);

    for line in 0..height {
        if y + line >= term_h {
            break;
        }
        queue!(out, cursor::MoveTo(0, (y + line) as u16))?;
        for (i, &width) in widths.iter().enumerate() {
            let text = cells[i].get(line).map(String::as_str).unwrap_or("");
            queue!(out, Print(format_cell(text, width, numeric[i])))?;
            if i + 1 < widths.len() {
                queue!(out, Print(" ".repeat(COLUMN_GAP)))?;
            }
        }
    }
    Ok(height)
}

/// Pad or truncate `text` to exactly `width` columns. Numeric columns
/// are right-aligned.
fn format_cell(text: &str, width: usize, right_align: bool) -> String {
    let text_width = display_width(text);
    if text_width > width {
        return truncate_to_width(text, width);
    }
    let padding = " ".repeat(width - text_width);
    if right_align {
        format!("{padding}{text}")
    } else {
        format!("{text}{padding}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cell_pads_to_width() {
        assert_eq!(format_cell("ab", 5, false), "ab   ");
        assert_eq!(format_cell("ab", 5, true), "   ab");
        assert_eq!(format_cell("ab", 2, false), "ab");
    }

    #[test]
    fn test_format_cell_truncates_overflow() {
        assert_eq!(format_cell("abcdef", 4, false), "abc…");
    }

    #[test]
    fn test_column_at_x_maps_positions() {
        // Columns: [0..3), gap at 3, [4..9), gap at 9, [10..12).
        let widths = [3, 5, 2];
        assert_eq!(column_at_x(&widths, 0), Some(0));
        assert_eq!(column_at_x(&widths, 2), Some(0));
        assert_eq!(column_at_x(&widths, 3), None);
        assert_eq!(column_at_x(&widths, 4), Some(1));
        assert_eq!(column_at_x(&widths, 8), Some(1));
        assert_eq!(column_at_x(&widths, 10), Some(2));
        assert_eq!(column_at_x(&widths, 12), None);
        assert_eq!(column_at_x(&widths, 99), None);
    }

    #[test]
    fn test_column_at_x_empty() {
        assert_eq!(column_at_x(&[], 0), None);
    }
}
