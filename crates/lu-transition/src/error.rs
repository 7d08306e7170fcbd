use lu_core::{CoreError, Year};
use lu_data::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("solve year {target} must be after the solve's base year {base}")]
    SolveYearOrder { base: Year, target: Year },

    #[error("{what} shape {got:?} does not match {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        got:      (usize, usize, usize),
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Data(#[from] DataError),
}

pub type TransitionResult<T> = Result<T, TransitionError>;
