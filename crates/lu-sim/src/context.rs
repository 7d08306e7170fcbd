//! Everything an optimizer sees for one solve.

use lu_biodiversity::{BiodiversityMatrices, biodiversity_matrices};
use lu_core::{LandUseHistory, LandUseMaps, Settings, Year};
use lu_data::DomainData;
use lu_targets::{Limits, resolve_limits};
use lu_transition::{
    TransitionCosts, WaterRequirementModel, transition_cost_breakdown, transition_costs,
};

use crate::SimResult;

/// Read-only inputs of the solve that moves the landscape from `base_year`
/// to `target_year`.
///
/// Built once per year by [`Sim`](crate::Sim) (or directly with
/// [`YearInputs::build`]) and only borrowed by the optimizer.
pub struct YearInputs<'a> {
    pub base_year:    Year,
    pub target_year:  Year,
    pub data:         &'a DomainData,
    pub settings:     &'a Settings,
    /// Land use at `base_year`.
    pub current:      &'a LandUseMaps,
    pub costs:        TransitionCosts,
    pub biodiversity: BiodiversityMatrices,
    pub limits:       Limits,
}

impl<'a> YearInputs<'a> {
    /// `cost_breakdown` keeps the per-component cost tensors alongside
    /// `t_mrj`.
    pub fn build(
        data:           &'a DomainData,
        settings:       &'a Settings,
        water:          &dyn WaterRequirementModel,
        history:        &'a LandUseHistory,
        base_year:      Year,
        target_year:    Year,
        cost_breakdown: bool,
    ) -> SimResult<Self> {
        let current = history.get(base_year)?;
        let costs = if cost_breakdown {
            transition_cost_breakdown(data, settings, water, history, base_year, target_year)?
        } else {
            transition_costs(data, settings, water, history, base_year, target_year)?
        };
        let biodiversity = biodiversity_matrices(data, settings, history, target_year)?;
        let limits = resolve_limits(data, settings, history, target_year)?;
        Ok(Self { base_year, target_year, data, settings, current, costs, biodiversity, limits })
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.data.n_cells()
    }
}
