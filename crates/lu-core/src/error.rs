//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so history and settings violations surface
//! unchanged from whichever engine hit them first.

use thiserror::Error;

use crate::Year;

/// Fatal precondition violations detected by `lu-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("settings error: {0}")]
    Settings(String),

    #[error("settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown land use {0:?}")]
    UnknownLandUse(String),

    #[error("land-use code {0} is neither agricultural nor non-agricultural")]
    InvalidLandUseCode(u16),

    #[error("history has no land-use map for year {0}")]
    MissingYear(Year),

    #[error("history append out of order: last year {last}, got {got}")]
    HistoryOrder { last: Year, got: Year },

    #[error("{what} length {got} does not match cell count {expected}")]
    CellCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `lu-core`.
pub type CoreResult<T> = Result<T, CoreError>;
