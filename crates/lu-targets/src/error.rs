use lu_biodiversity::BiodiversityError;
use lu_core::{CoreError, Year};
use lu_data::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("GHG limits_type = \"file\" but no GHG limit table was loaded")]
    MissingGhgTable,

    #[error("GHG limit table has no scenario column {0:?}")]
    MissingGhgField(String),

    #[error("GHG limit table has no entry for {0}")]
    MissingGhgYear(Year),

    #[error("water region {0} has no historical yield")]
    MissingYield(u16),

    #[error("{framework} reference data has no values for {year}")]
    MissingFrameworkYear {
        framework: &'static str,
        year:      Year,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Biodiversity(#[from] BiodiversityError),
}

pub type TargetResult<T> = Result<T, TargetError>;
