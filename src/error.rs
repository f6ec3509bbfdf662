use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("column `{column}` appears more than once after standardizing names")]
    DuplicateColumn { column: String },

    #[error("invalid date {value:?} in column `{column}` at row {row}: expected YYYY-MM-DD")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("missing date in column `{column}` at row {row}")]
    MissingDate { column: String, row: usize },

    #[error("non-numeric value {value:?} in column `{column}` at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column `{column}` has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: DataType },

    #[error("invalid {name}: {value} (weights must be finite and non-negative)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
