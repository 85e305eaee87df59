//! CSV loading.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tabgrid::Table;

use crate::error::AppError;

/// Options controlling how input is parsed.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub has_header: bool,
}

/// Read CSV from the file at `input`, or stdin when absent, into a table.
pub fn load(input: Option<&Path>, options: LoadOptions) -> Result<Table, AppError> {
    match input {
        Some(path) => from_reader(File::open(path)?, options),
        None => from_reader(io::stdin().lock(), options),
    }
}

/// Parse CSV from bytes already in memory.
pub fn from_bytes(bytes: &[u8], options: LoadOptions) -> Result<Table, AppError> {
    from_reader(bytes, options)
}

/// Parse CSV from any reader into a table.
pub fn from_reader<R: Read>(reader: R, options: LoadOptions) -> Result<Table, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .from_reader(reader);

    let header = if options.has_header {
        Some(csv_reader.headers()?.iter().map(str::to_string).collect())
    } else {
        None
    };

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMA: LoadOptions = LoadOptions {
        delimiter: b',',
        has_header: true,
    };

    #[test]
    fn test_header_row_is_split_off() {
        let table = from_bytes(b"name,age\nalice,30\nbob,41\n", COMMA).unwrap();
        assert_eq!(
            table.header().map(|h| h[0].text.as_str()),
            Some("name")
        );
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1].cell_text(1), "41");
    }

    #[test]
    fn test_headerless_input_keeps_first_row() {
        let options = LoadOptions {
            delimiter: b',',
            has_header: false,
        };
        let table = from_bytes(b"a,b\nc,d\n", options).unwrap();
        assert!(table.header().is_none());
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].cell_text(0), "a");
    }

    #[test]
    fn test_tab_delimiter() {
        let options = LoadOptions {
            delimiter: b'\t',
            has_header: true,
        };
        let table = from_bytes(b"x\ty\n1\t2\n", options).unwrap();
        assert_eq!(table.rows()[0].cell_text(1), "2");
    }

    #[test]
    fn test_quoted_fields() {
        let table = from_bytes(b"h1,h2\n\"a,b\",c\n", COMMA).unwrap();
        assert_eq!(table.rows()[0].cell_text(0), "a,b");
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        assert!(from_bytes(b"a,b\n1,2,3\n", COMMA).is_err());
    }
}
