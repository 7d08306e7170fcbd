//! Integration tests for lu-sim.

use lu_core::{LandMgmt, LandUse, LandUseHistory, LandUseMaps, NonAgLandUse, Settings, Year};
use lu_data::fixtures::{BASE_YEAR, WINTER_CEREALS, tiny_base_maps, tiny_domain, tiny_taxonomy};

use crate::{
    Allocation, HoldCurrentOptimizer, NoopObserver, Optimizer, SimBuilder, SimError, SimObserver,
    SimResult, YearInputs,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn hold_sim() -> crate::Sim<HoldCurrentOptimizer> {
    SimBuilder::new(Settings::default(), tiny_domain(), tiny_base_maps(), HoldCurrentOptimizer)
        .build()
        .unwrap()
}

/// Converts cell 0 to Environmental Plantings in the first solve, then holds.
struct PlantCellZero;

impl Optimizer for PlantCellZero {
    fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation> {
        let mut alloc = Allocation::hold(inputs.current, inputs.data.n_ag(), inputs.data.n_non_ag())?;
        if inputs.target_year == Year(2020) {
            alloc.ag_mrj.slice_mut(ndarray::s![.., 0, ..]).fill(0.0);
            alloc.non_ag_rk[[0, 0]] = 1.0;
        }
        Ok(alloc)
    }
}

/// Returns half a cell.
struct HalfCell;

impl Optimizer for HalfCell {
    fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation> {
        let mut alloc = Allocation::hold(inputs.current, inputs.data.n_ag(), inputs.data.n_non_ag())?;
        alloc.ag_mrj[[0, 0, WINTER_CEREALS.index()]] = 0.5;
        Ok(alloc)
    }
}

#[derive(Default)]
struct Recorder {
    starts:     Vec<(Year, Year)>,
    legal:      Vec<usize>,
    ends:       usize,
    final_year: Option<Year>,
}

impl SimObserver for Recorder {
    fn on_year_start(&mut self, base_year: Year, target_year: Year) {
        self.starts.push((base_year, target_year));
    }

    fn on_year_inputs(&mut self, inputs: &YearInputs<'_>) {
        self.legal.push(inputs.costs.x_mrj.iter().filter(|&&b| b).count());
    }

    fn on_year_end(&mut self, _inputs: &YearInputs<'_>, _allocation: &Allocation, _maps: &LandUseMaps) {
        self.ends += 1;
    }

    fn on_sim_end(&mut self, final_year: Year) {
        self.final_year = Some(final_year);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = hold_sim();
        assert_eq!(sim.history.len(), 1);
        assert_eq!(sim.remaining_years(), &[Year(2020), Year(2030), Year(2040), Year(2050)]);
    }

    #[test]
    fn cell_count_mismatch_errors() {
        let maps = LandUseMaps::from_codes(&[3, 1], &[0, 0], &tiny_taxonomy()).unwrap();
        let result = SimBuilder::new(Settings::default(), tiny_domain(), maps, HoldCurrentOptimizer).build();
        assert!(matches!(result, Err(SimError::CellCountMismatch { expected: 4, got: 2, .. })));
    }

    #[test]
    fn history_must_start_at_base_year() {
        let h = LandUseHistory::new(Year(2000), tiny_base_maps());
        let result = SimBuilder::new(Settings::default(), tiny_domain(), tiny_base_maps(), HoldCurrentOptimizer)
            .history(h)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn resumes_after_latest_history_year() {
        let mut h = LandUseHistory::new(BASE_YEAR, tiny_base_maps());
        h.push(Year(2020), tiny_base_maps()).unwrap();
        let sim = SimBuilder::new(Settings::default(), tiny_domain(), tiny_base_maps(), HoldCurrentOptimizer)
            .history(h)
            .build()
            .unwrap();
        assert_eq!(sim.remaining_years(), &[Year(2030), Year(2040), Year(2050)]);
    }

    #[test]
    fn invalid_settings_rejected() {
        let mut s = Settings::default();
        s.economics.amortisation_period = 0;
        let result = SimBuilder::new(s, tiny_domain(), tiny_base_maps(), HoldCurrentOptimizer).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }
}

// ── Year loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn hold_keeps_every_year_identical() {
        let mut sim = hold_sim();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.history.len(), 5);
        for year in sim.history.years() {
            assert_eq!(sim.history.get(year).unwrap(), &tiny_base_maps());
        }
    }

    #[test]
    fn observer_sees_every_year() {
        let mut sim = hold_sim();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.starts.first(), Some(&(Year(2010), Year(2020))));
        assert_eq!(rec.starts.last(), Some(&(Year(2040), Year(2050))));
        assert_eq!(rec.ends, 4);
        assert_eq!(rec.legal.len(), 4);
        assert!(rec.legal.iter().all(|&n| n > 0));
        assert_eq!(rec.final_year, Some(Year(2050)));
    }

    #[test]
    fn step_stops_after_last_year() {
        let mut sim = hold_sim();
        assert_eq!(sim.step(&mut NoopObserver).unwrap(), Some(Year(2020)));
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.step(&mut NoopObserver).unwrap(), None);
        assert!(sim.remaining_years().is_empty());
    }

    #[test]
    fn allocation_drives_history() {
        let mut sim = SimBuilder::new(Settings::default(), tiny_domain(), tiny_base_maps(), PlantCellZero)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        for year in [2020, 2030, 2050] {
            let maps = sim.history.get(Year(year)).unwrap();
            assert_eq!(maps.land_use(0), LandUse::NonAg(NonAgLandUse(0)));
            assert_eq!(maps.land_mgmt(0), LandMgmt::DRYLAND);
        }
        assert_eq!(sim.history.get(BASE_YEAR).unwrap(), &tiny_base_maps());
    }

    #[test]
    fn invalid_allocation_leaves_history_untouched() {
        let mut sim = SimBuilder::new(Settings::default(), tiny_domain(), tiny_base_maps(), HalfCell)
            .build()
            .unwrap();
        let err = sim.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Allocation(_)));
        assert_eq!(sim.history.len(), 1);
        assert_eq!(sim.remaining_years().len(), 4);
    }
}

// ── Allocation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod allocation_tests {
    use super::*;

    #[test]
    fn hold_round_trips_to_the_same_maps() {
        let maps = tiny_base_maps();
        let alloc = Allocation::hold(&maps, 4, 2).unwrap();
        alloc.validate(4, 4, 2).unwrap();
        assert_eq!(alloc.to_maps().unwrap(), maps);
    }

    #[test]
    fn dominant_share_wins_with_first_on_ties() {
        let mut alloc = Allocation::hold(&tiny_base_maps(), 4, 2).unwrap();
        // Cell 0: half dryland Winter cereals, half irrigated Beef - modified land.
        alloc.ag_mrj[[0, 0, 3]] = 0.5;
        alloc.ag_mrj[[1, 0, 0]] = 0.5;
        // Cell 1: mostly Destocked natural land.
        alloc.ag_mrj[[0, 1, 1]] = 0.4;
        alloc.non_ag_rk[[1, 1]] = 0.6;
        alloc.validate(4, 4, 2).unwrap();

        let maps = alloc.to_maps().unwrap();
        assert_eq!(maps.land_use(0), LandUse::Ag(WINTER_CEREALS));
        assert_eq!(maps.land_mgmt(0), LandMgmt::DRYLAND);
        assert_eq!(maps.land_use(1), LandUse::NonAg(NonAgLandUse(1)));
    }

    #[test]
    fn wrong_shape_rejected() {
        let mut alloc = Allocation::hold(&tiny_base_maps(), 4, 2).unwrap();
        alloc.ag_mrj = ndarray::Array3::zeros((LandMgmt::COUNT, 4, 3));
        assert!(matches!(alloc.validate(4, 4, 2), Err(SimError::Allocation(_))));
    }

    #[test]
    fn hold_rejects_land_use_outside_counts() {
        // Base maps hold Winter cereals (j = 3) on two cells.
        let result = Allocation::hold(&tiny_base_maps(), 3, 2);
        assert!(matches!(result, Err(SimError::Allocation(_))));
        // Every base cell is agricultural, so no non-ag column is needed.
        assert!(Allocation::hold(&tiny_base_maps(), 4, 0).is_ok());
    }

    #[test]
    fn negative_share_rejected() {
        let mut alloc = Allocation::hold(&tiny_base_maps(), 4, 2).unwrap();
        alloc.ag_mrj[[0, 0, 0]] = -0.5;
        alloc.ag_mrj[[0, 0, 3]] = 1.5;
        assert!(matches!(alloc.validate(4, 4, 2), Err(SimError::Allocation(_))));
    }
}
