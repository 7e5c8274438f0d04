use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by ingestion and the volatility engine.
///
/// Schema problems (`MissingColumn`, `DuplicateColumn`, `NonNumeric`,
/// `RowWidth`) reject the input wholesale; there is no row-level recovery.
/// An undefined statistic is not an error and is reported as `None` by the
/// computation functions instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is absent after header normalization.
    #[error("required column `{0}` is missing")]
    MissingColumn(&'static str),

    /// Two headers collapse to the same name after trimming.
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    /// A cell that must be numeric holds something else.
    #[error("non-numeric value `{value}` in column `{column}` at row {row}")]
    NonNumeric {
        /// Column the offending cell belongs to.
        column: String,
        /// Zero-based row index of the offending cell.
        row: usize,
        /// The raw cell content, or `<empty>` for a blank cell.
        value: String,
    },

    /// A row or appended column does not match the frame's dimensions.
    #[error("expected {expected} values, got {got}")]
    RowWidth {
        /// Number of values the frame requires.
        expected: usize,
        /// Number of values actually supplied.
        got: usize,
    },

    /// The annualization scale must be finite and strictly positive.
    #[error("annualization scale must be positive, got {0}")]
    InvalidScale(f64),

    /// Failure while parsing delimited text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Failure while reading the source file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
