use thiserror::Error;

/// Errors surfaced at the boundary calls of the chart core.
///
/// An empty visible set is not an error; see [`crate::data_types::Scaled`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid window [{start}, {end}) for dataset of length {length}")]
    InvalidWindow {
        start: usize,
        end: usize,
        length: usize,
    },
    #[error("no field qualifies as the x axis")]
    NoXAxisField,
    #[error("dataset has no points")]
    EmptyDataset,
    #[error("column `{field}` has {actual} values, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("column `{field}` holds a non-numeric value at position {position}")]
    InvalidColumn { field: String, position: usize },
    #[error("unknown series field `{0}`")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
