//! HTML rendering.
//!
//! Produces a self-contained page: the table plus the embedded
//! stylesheet. Cell text passes through unmodified.

use std::path::Path;

use tabgrid::Table;

const STYLE: &str = include_str!("../assets/style.css");

/// Fallback page title when the input has no file name (stdin).
const DEFAULT_TITLE: &str = "CSV to HTML";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub detect_links: bool,
    pub title: String,
}

/// Page title for the given input path: its base name, or the default.
pub fn title_for(input: Option<&Path>) -> String {
    input
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Render the full HTML page for `table`.
pub fn render_page(table: &mut Table, options: &RenderOptions) -> String {
    let body = render_table(table, options.detect_links);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        options.title, STYLE, body
    )
}

/// Render just the `<table>` element.
pub fn render_table(table: &mut Table, detect_links: bool) -> String {
    let numeric: Vec<bool> = (0..table.column_count())
        .map(|c| table.column_type(c).is_numeric())
        .collect();

    let mut h = String::new();
    h.push_str("<table>");
    if let Some(header) = table.header() {
        h.push_str("<thead>");
        for (i, cell) in header.iter().enumerate() {
            open_cell(&mut h, "th", &numeric, i);
            h.push_str("<span class=\"header-cell-content\">");
            h.push_str(&cell.text);
            h.push_str("</span></th>");
        }
        h.push_str("</thead>");
    }
    h.push_str("<tbody>");
    for row in table.rows() {
        h.push_str("<tr>");
        for (i, cell) in row.cells().iter().enumerate() {
            open_cell(&mut h, "td", &numeric, i);
            if detect_links && is_link(&cell.text) {
                h.push_str("<a href=\"");
                h.push_str(&cell.text);
                h.push_str("\">");
                h.push_str(&cell.text);
                h.push_str("</a>");
            } else {
                h.push_str(&cell.text);
            }
            h.push_str("</td>");
        }
        h.push_str("</tr>");
    }
    h.push_str("</tbody></table>");
    h
}

fn open_cell(h: &mut String, tag: &str, numeric: &[bool], column: usize) {
    h.push('<');
    h.push_str(tag);
    if numeric.get(column).copied().unwrap_or(false) {
        h.push_str(" class=\"numeric\"");
    }
    h.push('>');
}

fn is_link(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}
