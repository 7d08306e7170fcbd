use lu_biodiversity::BiodiversityError;
use lu_core::CoreError;
use lu_targets::TargetError;
use lu_transition::TransitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match cell count {expected}")]
    CellCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid allocation: {0}")]
    Allocation(String),

    #[error("optimizer failed: {0}")]
    Optimizer(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Biodiversity(#[from] BiodiversityError),

    #[error(transparent)]
    Target(#[from] TargetError),
}

pub type SimResult<T> = Result<T, SimError>;
