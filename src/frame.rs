use ahash::RandomState;
use hashbrown::HashMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{Error, Result};

/// Name of the required closing-price column.
pub const CLOSE: &str = "Close";

/// Column-name to column-position lookup.
type ColumnIndex = HashMap<String, usize, RandomState>;

/// A single tabular value.
///
/// Serializes untagged: `Number` as a JSON number, `Text` as a string and
/// `Empty` as `null`, so an undefined observation is never mistaken for zero.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric value.
    Number(f64),
    /// A non-numeric value, kept verbatim.
    Text(String),
    /// A missing or undefined value.
    Empty,
}

impl Cell {
    /// Returns the numeric value, or `None` for text and empty cells.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` for a missing or undefined value.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

/// An ordered tabular price series.
///
/// Rows stay in insertion order, which is taken to be chronological order as
/// given by the source dataset; the frame never re-sorts. Column names are
/// case- and whitespace-sensitive keys resolved through a hash index.
///
/// A frame is transient: it is built per invocation, enriched by the engine
/// and discarded once the result has been communicated to the caller.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Column names in declaration order.
    columns: Vec<String>,
    /// Name to position lookup over `columns`.
    index: ColumnIndex,
    /// Row-major cell storage; every row has `columns.len()` cells.
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Creates an empty frame with the given column names.
    ///
    /// # Arguments
    ///
    /// * `columns` - The column names, in order
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The frame, or `Error::DuplicateColumn` if two
    ///   names are equal
    pub fn new(columns: Vec<impl Into<String>>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = build_index(&columns)?;
        Ok(Self {
            columns,
            index,
            rows: Vec::new(),
        })
    }

    /// Appends one row of cells.
    ///
    /// # Arguments
    ///
    /// * `cells` - One cell per column, in column order
    ///
    /// # Returns
    ///
    /// * `Result<()>` - `Error::RowWidth` if the cell count does not match
    ///   the column count
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::RowWidth {
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Trims surrounding whitespace from every column name.
    ///
    /// Idempotent: applying it twice yields the same names. Row order and
    /// cell contents are untouched.
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The normalized frame, `Error::MissingColumn` if
    ///   `Close` is absent after trimming, or `Error::DuplicateColumn` if
    ///   two trimmed names collide
    ///
    /// # Examples
    ///
    /// ```
    /// use historical_volatility::Frame;
    ///
    /// let frame = Frame::new(vec![" Close ", "Date"])?;
    /// let frame = frame.normalize_columns()?;
    /// assert_eq!(frame.column_names(), ["Close", "Date"]);
    /// # Ok::<(), historical_volatility::Error>(())
    /// ```
    pub fn normalize_columns(mut self) -> Result<Self> {
        self.columns = self
            .columns
            .into_iter()
            .map(|name| name.trim().to_owned())
            .collect();
        self.index = build_index(&self.columns)?;

        if !self.index.contains_key(CLOSE) {
            return Err(Error::MissingColumn(CLOSE));
        }
        Ok(self)
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if a column with the given name exists.
    pub fn contains_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns an iterator over one column's cells, oldest first.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let pos = *self.index.get(name)?;
        Some(self.rows.iter().map(move |row| &row[pos]))
    }

    /// Extracts a column as numeric values, failing fast on the first cell
    /// that is not a number.
    ///
    /// # Arguments
    ///
    /// * `name` - The column to extract
    ///
    /// # Returns
    ///
    /// * `Result<Vec<f64>>` - One value per row, `Error::MissingColumn` if
    ///   the column does not exist, or `Error::NonNumeric` naming the first
    ///   offending cell
    pub fn numeric_column(&self, name: &'static str) -> Result<Vec<f64>> {
        let cells = self.column(name).ok_or(Error::MissingColumn(name))?;
        cells
            .enumerate()
            .map(|(row, cell)| {
                cell.as_f64().ok_or_else(|| Error::NonNumeric {
                    column: name.to_owned(),
                    row,
                    value: match cell {
                        Cell::Text(text) => text.clone(),
                        _ => "<empty>".to_owned(),
                    },
                })
            })
            .collect()
    }

    /// Appends a new column to the right of the existing ones.
    ///
    /// # Arguments
    ///
    /// * `name` - The new column's name
    /// * `cells` - One cell per existing row
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The widened frame, `Error::DuplicateColumn` if the
    ///   name is taken, or `Error::RowWidth` if the cell count does not
    ///   match the row count
    pub fn with_column(mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<Self> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if cells.len() != self.rows.len() {
            return Err(Error::RowWidth {
                expected: self.rows.len(),
                got: cells.len(),
            });
        }

        self.index.insert(name.clone(), self.columns.len());
        self.columns.push(name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        Ok(self)
    }
}

/// Serializes as a sequence of `{column: value}` records, one per row.
impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

fn build_index(columns: &[String]) -> Result<ColumnIndex> {
    let mut index = ColumnIndex::default();
    for (pos, name) in columns.iter().enumerate() {
        if index.insert(name.clone(), pos).is_some() {
            return Err(Error::DuplicateColumn(name.clone()));
        }
    }
    Ok(index)
}
