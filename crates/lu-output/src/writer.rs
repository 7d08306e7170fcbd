//! The `OutputWriter` trait implemented by backend writers.

use crate::{BiodiversityScoreRow, LimitRow, OutputResult, TransitionCostRow};

/// Trait implemented by output backends.
///
/// Errors are stored by [`SimOutputObserver`](crate::SimOutputObserver) and
/// retrieved with `take_error` after the run.
pub trait OutputWriter {
    fn write_transition_costs(&mut self, rows: &[TransitionCostRow]) -> OutputResult<()>;

    fn write_biodiversity_scores(&mut self, rows: &[BiodiversityScoreRow]) -> OutputResult<()>;

    fn write_limits(&mut self, rows: &[LimitRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
