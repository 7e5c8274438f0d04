//! Delimited-text loading.
//!
//! Turns a CSV or TSV file into a [`Frame`]. Fields are trimmed; headers are
//! left untouched so that column-name normalization stays the engine's job.
//! Spreadsheet formats are not parsed here; callers holding such data build
//! a [`Frame`] directly.

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::{Cell, Frame, Result};

/// Reads a delimited-text file into a frame.
///
/// The delimiter is picked from the extension: `.tsv` means tab, anything
/// else means comma. Row order in the file is preserved.
///
/// # Arguments
///
/// * `path` - The file to read
///
/// # Returns
///
/// * `Result<Frame>` - The parsed frame, or an `Io`/`Csv`/schema error
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Frame> {
    let path = path.as_ref();
    let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    };

    let frame = read_csv_reader(File::open(path)?, delimiter)?;
    info!(
        path = %path.display(),
        rows = frame.row_count(),
        columns = frame.column_names().len(),
        "loaded price series"
    );
    Ok(frame)
}

/// Reads delimited text from any reader into a frame.
///
/// This is the entry point for upload handlers that hold bytes rather than
/// a path. The first record is taken as the header row.
///
/// # Arguments
///
/// * `reader` - The delimited-text source
/// * `delimiter` - The field delimiter, e.g. `b','`
///
/// # Returns
///
/// * `Result<Frame>` - The parsed frame, or a `Csv`/schema error
pub fn read_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Frame> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::Fields)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut frame = Frame::new(headers)?;
    for record in rdr.records() {
        frame.push_row(record?.iter().map(parse_cell).collect())?;
    }
    Ok(frame)
}

fn parse_cell(field: &str) -> Cell {
    if field.is_empty() {
        Cell::Empty
    } else if let Ok(value) = field.parse::<f64>() {
        Cell::Number(value)
    } else {
        Cell::Text(field.to_owned())
    }
}
