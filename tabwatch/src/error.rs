//! Application error types.

use std::io;

use thiserror::Error;

/// Errors surfaced by the tabwatch application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading the input (or another local file) failed.
    #[error("read input: {0}")]
    Io(#[from] io::Error),

    /// The input could not be parsed as CSV.
    #[error("parse csv: {0}")]
    Csv(#[from] csv::Error),

    /// The configured separator is not usable.
    #[error("invalid separator {0:?}: must be exactly one byte")]
    Separator(String),

    /// `--connect` was given an unusable base URL.
    #[error("invalid connect url {url:?}: {source}")]
    ConnectUrl {
        url: String,
        source: url::ParseError,
    },

    /// Fetching the document from a serving instance failed.
    #[error("fetch document: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The serving instance answered the document fetch with a
    /// non-success status.
    #[error("fetch document: HTTP {0}")]
    FetchStatus(u16),

    /// Serve mode could not use the given address.
    #[error("serve on {addr}: {source}")]
    Serve { addr: String, source: io::Error },

    /// The terminal viewer has nothing to show.
    #[error("the terminal viewer requires --input or --connect")]
    ViewerInput,
}
