use lu_core::{CoreError, Year};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("reference data parse error: {0}")]
    Parse(String),

    #[error("{what} length {got} does not match {expected}")]
    ShapeMismatch {
        expected: String,
        got:      String,
        what:     &'static str,
    },

    #[error("{what} contains an invalid value {value} at index {index}")]
    InvalidValue {
        what:  &'static str,
        index: usize,
        value: f64,
    },

    #[error("reference layer not loaded: {0}")]
    MissingLayer(String),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    #[error("{what} has no entry for year {year}")]
    MissingYear { what: &'static str, year: Year },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    pub(crate) fn shape(what: &'static str, expected: impl std::fmt::Debug, got: impl std::fmt::Debug) -> Self {
        DataError::ShapeMismatch {
            expected: format!("{expected:?}"),
            got:      format!("{got:?}"),
            what,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Parse(e.to_string())
    }
}
