use lu_core::CoreError;
use lu_data::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BiodiversityError {
    #[error("framework {0} is enabled but no reference data was loaded for it")]
    MissingFramework(&'static str),

    #[error("{what} length {got} does not match cell count {expected}")]
    CellCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("habitat_condition is USER_DEFINED but {0:?} has no contribution")]
    MissingContribution(String),

    #[error("{what} has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        what:     String,
        expected: Vec<usize>,
        got:      Vec<usize>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Data(#[from] DataError),
}

pub type BiodiversityResult<T> = Result<T, BiodiversityError>;
