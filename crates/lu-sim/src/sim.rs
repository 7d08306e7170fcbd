//! The `Sim` struct and its year loop.

use lu_core::{LandUseHistory, Settings, Year};
use lu_data::DomainData;
use lu_transition::WaterRequirementModel;

use crate::{Optimizer, SimObserver, SimResult, YearInputs};

/// The year-loop runner.
///
/// For each consecutive pair `(base, target)` of `settings.sim_years`:
///
/// 1. **Inputs**: build `x_mrj`/`t_mrj`, the biodiversity tensors and the
///    limits for the solve ([`YearInputs::build`]).
/// 2. **Solve**: call [`Optimizer::solve`].
/// 3. **Accept**: validate the allocation and derive the new lumap/lmmap.
/// 4. **Append**: push the maps into history at `target`.
///
/// History is only ever written here, so years are strictly serialised.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<O: Optimizer> {
    pub settings:       Settings,
    pub data:           DomainData,
    /// Append-only; starts with the base-year maps.
    pub history:        LandUseHistory,
    pub optimizer:      O,
    pub water:          Box<dyn WaterRequirementModel>,
    /// Keep per-component transition costs in each year's inputs.
    pub cost_breakdown: bool,
    /// Index into `settings.sim_years` of the next target year.
    pub(crate) next:    usize,
}

impl<O: Optimizer> Sim<O> {
    /// Run every remaining solve year.
    pub fn run<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<()> {
        while self.step(observer)?.is_some() {}
        let (final_year, _) = self.history.latest();
        tracing::info!(%final_year, years = self.history.len(), "simulation finished");
        observer.on_sim_end(final_year);
        Ok(())
    }

    /// Solve the next year.  Returns the year solved, or `None` when every
    /// year of `settings.sim_years` is done.
    pub fn step<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<Option<Year>> {
        let Some(&target_year) = self.settings.sim_years.get(self.next) else {
            return Ok(None);
        };
        let base_year = self.settings.sim_years[self.next - 1];

        observer.on_year_start(base_year, target_year);
        let span = tracing::info_span!("solve", %base_year, %target_year);
        let _guard = span.enter();

        let maps = {
            let inputs = YearInputs::build(
                &self.data,
                &self.settings,
                self.water.as_ref(),
                &self.history,
                base_year,
                target_year,
                self.cost_breakdown,
            )?;
            observer.on_year_inputs(&inputs);

            let allocation = self.optimizer.solve(&inputs)?;
            allocation.validate(self.data.n_cells(), self.data.n_ag(), self.data.n_non_ag())?;
            let maps = allocation.to_maps()?;

            let changed = (0..maps.n_cells())
                .filter(|&r| {
                    maps.land_use(r) != inputs.current.land_use(r)
                        || maps.land_mgmt(r) != inputs.current.land_mgmt(r)
                })
                .count();
            tracing::info!(changed, "allocation accepted");

            observer.on_year_end(&inputs, &allocation, &maps);
            maps
        };

        self.history.push(target_year, maps)?;
        self.next += 1;
        Ok(Some(target_year))
    }

    /// Years still to solve.
    pub fn remaining_years(&self) -> &[Year] {
        &self.settings.sim_years[self.next.min(self.settings.sim_years.len())..]
    }
}
