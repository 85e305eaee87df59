//! Wrap mode: zero-width break markers after path-like punctuation.

use crate::model::Table;
use crate::text::char_width;

/// Break opportunity inserted after each `/` and `:` in wrap mode.
pub const BREAK_MARKER: char = '\u{200B}';

impl Table {
    /// Toggle wrap mode and return the new state.
    pub fn toggle_wrap(&mut self) -> bool {
        let enabled = !self.wrap;
        self.set_wrap(enabled);
        enabled
    }

    /// Enable or disable wrap mode, transforming every header and body
    /// cell. Enabling twice inserts nothing new; disabling restores each
    /// cell's original text.
    pub fn set_wrap(&mut self, enabled: bool) {
        let transform = if enabled { insert_markers } else { remove_markers };
        for cell in self.header.iter_mut().flatten() {
            cell.text = transform(&cell.text);
        }
        for row in &mut self.rows {
            for cell in &mut row.cells {
                cell.text = transform(&cell.text);
            }
        }
        self.wrap = enabled;
    }
}

/// Insert a break marker after each `/` and `:` that does not already
/// carry one.
pub fn insert_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if (c == '/' || c == ':') && chars.peek() != Some(&BREAK_MARKER) {
            out.push(BREAK_MARKER);
        }
    }
    out
}

/// Remove every break marker, merging the text back into one run.
pub fn remove_markers(text: &str) -> String {
    text.chars().filter(|&c| c != BREAK_MARKER).collect()
}

/// Split `text` into display lines of at most `max_width` columns.
///
/// Lines break at marker positions and after spaces; a fragment that
/// cannot fit on a line of its own is broken mid-character-run. Markers
/// never appear in the output.
pub fn break_lines(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0usize;

    for segment in text.split(BREAK_MARKER) {
        for unit in segment.split_inclusive(' ') {
            let unit_width: usize = unit.chars().map(char_width).sum();
            if line_width > 0 && line_width + unit_width > max_width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if unit_width <= max_width {
                line.push_str(unit);
                line_width += unit_width;
            } else {
                for c in unit.chars() {
                    let w = char_width(c);
                    if line_width > 0 && line_width + w > max_width {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += w;
                }
            }
        }
    }
    lines.push(line);
    lines
}
