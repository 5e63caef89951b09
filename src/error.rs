use std::error::Error;
use std::fmt;

/// Errors raised while loading or preparing quotation datasets.
///
/// Any of these aborts the run: this is a one-shot batch tool with no retry
/// policy, so the variants carry enough context (column name, 1-based row)
/// for the operator to fix the input file.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A declared column is absent from the CSV header.
    MissingColumn(String),
    /// A cell failed coercion to its declared type.
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
    /// A label value outside {quotation, noise}.
    UnknownLabel { row: usize, value: String },
    /// A feature with zero variance in the training data cannot be scaled.
    DegenerateFeature(String),
    /// Row-aligned fields disagree on length.
    LengthMismatch { expected: usize, actual: usize },
    /// Training and testing datasets declare different feature columns.
    SchemaMismatch,
    /// Fitting a classifier requires both classes in the training data.
    SingleClass,
    /// An operation that needs rows received none (or too few for the
    /// statistic it computes).
    NotEnoughRows(usize),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataError::MissingColumn(column) => {
                write!(f, "Missing required column '{}'", column)
            }
            DataError::InvalidValue { column, row, value } => {
                write!(
                    f,
                    "Invalid value '{}' in column '{}' at row {}",
                    value, column, row
                )
            }
            DataError::UnknownLabel { row, value } => {
                write!(
                    f,
                    "Unknown label '{}' at row {} (expected 'quotation' or 'noise')",
                    value, row
                )
            }
            DataError::DegenerateFeature(column) => {
                write!(
                    f,
                    "Feature '{}' has zero variance in the training data; scaling is undefined",
                    column
                )
            }
            DataError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Row-aligned fields must have equal length (expected {}, got {})",
                    expected, actual
                )
            }
            DataError::SchemaMismatch => {
                write!(f, "Training and testing datasets must share one schema")
            }
            DataError::SingleClass => {
                write!(f, "Training data must contain both quotation and noise rows")
            }
            DataError::NotEnoughRows(n) => {
                write!(f, "Operation requires more rows than the {} provided", n)
            }
        }
    }
}

impl Error for DataError {}
