//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use lu_core::{LandUseMaps, Year};
use lu_sim::{Allocation, SimObserver, YearInputs};

use crate::tables::{biodiversity_score_rows, limit_rows, transition_cost_rows};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every accepted year to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    years:      usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, years: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of years written.
    pub fn years_written(&self) -> usize {
        self.years
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_year(&mut self, inputs: &YearInputs<'_>, allocation: &Allocation) -> OutputResult<()> {
        self.writer.write_transition_costs(&transition_cost_rows(inputs, allocation))?;
        self.writer.write_biodiversity_scores(&biodiversity_score_rows(inputs, allocation))?;
        self.writer.write_limits(&limit_rows(inputs, allocation)?)?;
        self.years += 1;
        Ok(())
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_year_end(&mut self, inputs: &YearInputs<'_>, allocation: &Allocation, _maps: &LandUseMaps) {
        let result = self.write_year(inputs, allocation);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, final_year: Year) {
        let result = self.writer.finish();
        if result.is_ok() {
            tracing::info!(%final_year, years = self.years, "output written");
        }
        self.store_err(result);
    }
}
