//! Command-line interface.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::AppError;

/// Render a CSV file as an HTML table, serve it, or browse it in the
/// terminal.
#[derive(Debug, Parser)]
#[command(name = "tabwatch", version, about)]
pub struct Cli {
    /// Input file. If not specified, stdin is used.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// CSV separator. Defaults to comma, unless --input has a .tsv
    /// extension. Use '\t' for tab.
    #[arg(long)]
    pub separator: Option<String>,

    /// Do not treat the first row as a header.
    #[arg(long)]
    pub no_header: bool,

    /// Do not detect links in cells when rendering HTML.
    #[arg(long)]
    pub no_detect_links: bool,

    /// Serve the HTML at the given address instead of writing to stdout.
    #[arg(long, value_name = "ADDR")]
    pub serve: Option<String>,

    /// In serve mode, do not watch the input file for changes.
    #[arg(long)]
    pub no_watch: bool,

    /// Open the interactive terminal viewer instead of emitting HTML.
    #[arg(long)]
    pub tui: bool,

    /// In terminal viewer mode, connect to a serving instance at the
    /// given base URL and reload when it signals a change.
    #[arg(long, value_name = "URL")]
    pub connect: Option<String>,
}

impl Cli {
    pub fn header(&self) -> bool {
        !self.no_header
    }

    pub fn detect_links(&self) -> bool {
        !self.no_detect_links
    }

    pub fn watch(&self) -> bool {
        !self.no_watch
    }
}

/// Resolve the effective CSV delimiter from the flag and the input path.
pub fn resolve_separator(
    separator: Option<&str>,
    input: Option<&Path>,
) -> Result<u8, AppError> {
    let sep = match separator {
        None | Some("") => {
            if input.and_then(Path::extension).is_some_and(|e| e == "tsv") {
                "\t"
            } else {
                ","
            }
        }
        Some("\\t") => "\t",
        Some(s) => s,
    };
    if sep.len() != 1 {
        return Err(AppError::Separator(sep.to_string()));
    }
    Ok(sep.as_bytes()[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_comma() {
        assert_eq!(resolve_separator(None, None).unwrap(), b',');
        assert_eq!(
            resolve_separator(None, Some(Path::new("data.csv"))).unwrap(),
            b','
        );
    }

    #[test]
    fn test_tsv_extension_implies_tab() {
        assert_eq!(
            resolve_separator(None, Some(Path::new("data.tsv"))).unwrap(),
            b'\t'
        );
        // An explicit separator wins over the extension.
        assert_eq!(
            resolve_separator(Some(";"), Some(Path::new("data.tsv"))).unwrap(),
            b';'
        );
    }

    #[test]
    fn test_literal_backslash_t_means_tab() {
        assert_eq!(resolve_separator(Some("\\t"), None).unwrap(), b'\t');
    }

    #[test]
    fn test_multibyte_separator_is_rejected() {
        assert!(matches!(
            resolve_separator(Some("ab"), None),
            Err(AppError::Separator(_))
        ));
        assert!(matches!(
            resolve_separator(Some("→"), None),
            Err(AppError::Separator(_))
        ));
    }
}
