//! Year-loop observer trait for progress reporting and data collection.

use lu_core::{LandUseMaps, Year};

use crate::{Allocation, YearInputs};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// year loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called before the inputs of the solve reaching `target_year` are built.
    fn on_year_start(&mut self, _base_year: Year, _target_year: Year) {}

    /// Called with the assembled inputs, before the optimizer runs.
    fn on_year_inputs(&mut self, _inputs: &YearInputs<'_>) {}

    /// Called once the allocation is accepted, before its maps are appended
    /// to history.
    fn on_year_end(&mut self, _inputs: &YearInputs<'_>, _allocation: &Allocation, _maps: &LandUseMaps) {}

    /// Called once after the final year.
    fn on_sim_end(&mut self, _final_year: Year) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
