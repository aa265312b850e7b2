//! Validation Error Types

use crate::record::Feature;
use thiserror::Error;

/// Errors found while validating a single record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("Column '{field}': Value {value} out of range ({min}-{max})")]
    OutOfRange {
        field: Feature,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Fractional value in an integer field
    #[error("Column '{field}': Value {value} is not a whole number")]
    NotWholeNumber { field: Feature, value: f64 },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(Feature),

    /// Field name that is not one of the seven features
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl ValidationError {
    /// Feature the error refers to, if any
    pub fn field(&self) -> Option<Feature> {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotWholeNumber { field, .. } => Some(*field),
            ValidationError::MissingField(field) => Some(*field),
            ValidationError::UnknownField(_) => None,
        }
    }
}

/// Validation error tied to a batch row (1-based)
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Row {row}, {error}")]
pub struct RowValidationError {
    pub row: usize,
    pub error: ValidationError,
}

/// Errors in the shape of an uploaded table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Wrong number of columns
    #[error("The uploaded CSV file must contain exactly {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// A row whose width differs from the table's
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// No header and no rows
    #[error("The uploaded CSV file is empty")]
    Empty,

    /// Unreadable CSV input
    #[error("Malformed CSV: {0}")]
    Malformed(String),
}

impl From<csv::Error> for SchemaError {
    fn from(err: csv::Error) -> Self {
        SchemaError::Malformed(err.to_string())
    }
}

/// A cell that could not be converted to its column's type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Error converting column '{column}' to its target type: {cause} (row {row}, value {value:?}). \
     Make sure you are giving integers for Nitrogen, Phosphorus and Potassium and decimal values for the rest"
)]
pub struct TypeCoercionError {
    pub column: Feature,
    pub row: usize,
    pub value: String,
    pub cause: String,
}

/// Errors that abort a whole batch before any prediction is requested
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Coercion(#[from] TypeCoercionError),
}
