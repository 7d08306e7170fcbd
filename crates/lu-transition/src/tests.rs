//! Unit tests for lu-transition.

use lu_core::{LandMgmt, LandUseHistory, LandUseMaps, Settings, Year};
use lu_data::fixtures::{BASE_YEAR, tiny_base_maps, tiny_domain, tiny_taxonomy};

fn base_history() -> LandUseHistory {
    LandUseHistory::new(BASE_YEAR, tiny_base_maps())
}

fn maps(codes: &[u16], lm: &[u8]) -> LandUseMaps {
    LandUseMaps::from_codes(codes, lm, &tiny_taxonomy()).unwrap()
}

const DRY: usize = 0;
const IRR: usize = 1;
// Fixture land uses.
const BM: usize = 0;
const BN: usize = 1;
const UN: usize = 2;
const WC: usize = 3;

#[cfg(test)]
mod amortise {
    use crate::{amortise, annuity_factor};

    #[test]
    fn standard_annuity() {
        let p = amortise(1_000.0, 0.07, 30);
        assert!((p - 80.586).abs() < 1e-3, "got {p}");
    }

    #[test]
    fn zero_rate_is_straight_line() {
        assert_eq!(amortise(300.0, 0.0, 30), 10.0);
    }

    #[test]
    fn single_period_repays_with_interest() {
        assert!((annuity_factor(0.05, 1) - 1.05).abs() < 1e-12);
    }

    #[test]
    fn nan_passes_through() {
        assert!(amortise(f64::NAN, 0.07, 30).is_nan());
    }
}

#[cfg(test)]
mod exclusion {
    use super::*;
    use crate::{exclusion_matrix, legal_count};

    #[test]
    fn agricultural_cells_use_current_row_and_static_mask() {
        let x = exclusion_matrix(&tiny_domain(), &base_history(), BASE_YEAR).unwrap();
        // Winter cereals → Beef - natural land is undefined in the table.
        assert_eq!(x.slice(ndarray::s![DRY, 0, ..]).to_vec(), vec![true, false, true, true]);
        // Irrigated natural land is excluded by the static mask.
        assert_eq!(x.slice(ndarray::s![IRR, 0, ..]).to_vec(), vec![true, false, false, true]);
        // Beef - natural land may go anywhere the static mask allows.
        assert_eq!(x.slice(ndarray::s![DRY, 1, ..]).to_vec(), vec![true, true, true, true]);
    }

    #[test]
    fn current_state_forced_legal() {
        let mut data = tiny_domain();
        data.static_exclusion[[IRR, 3, WC]] = false;
        data.ag_transition_costs[[WC, WC]] = f64::NAN;
        let x = exclusion_matrix(&data, &base_history(), BASE_YEAR).unwrap();
        assert!(x[[IRR, 3, WC]]);
        assert!(x[[DRY, 0, WC]]);
        // Cell 3 may no longer move to dryland Winter cereals.
        assert!(!x[[DRY, 3, WC]]);
        assert!(x[[DRY, 0, BM]]);
    }

    #[test]
    fn non_agricultural_cell_uses_base_year_row() {
        let mut h = base_history();
        // Cell 0 (Winter cereals in the base year) becomes Environmental Plantings.
        h.push(Year(2020), maps(&[100, 1, 2, 3], &[0, 0, 0, 1])).unwrap();
        let x = exclusion_matrix(&tiny_domain(), &h, Year(2020)).unwrap();
        assert_eq!(x.slice(ndarray::s![DRY, 0, ..]).to_vec(), vec![true, false, true, true]);
        assert!(!x[[IRR, 0, BN]]);
    }

    #[test]
    fn non_agricultural_since_base_year_has_no_options() {
        let h = LandUseHistory::new(BASE_YEAR, maps(&[101, 1, 2, 3], &[0, 0, 0, 1]));
        let x = exclusion_matrix(&tiny_domain(), &h, BASE_YEAR).unwrap();
        assert_eq!(legal_count(&x, LandMgmt::DRYLAND, 0), 0);
        assert_eq!(legal_count(&x, LandMgmt::IRRIGATED, 0), 0);
    }

    #[test]
    fn missing_year_is_fatal() {
        let err = exclusion_matrix(&tiny_domain(), &base_history(), Year(2020)).unwrap_err();
        assert!(matches!(err, crate::TransitionError::Core(lu_core::CoreError::MissingYear(_))));
    }

    #[test]
    fn cell_count_mismatch_is_fatal() {
        let h = LandUseHistory::new(BASE_YEAR, maps(&[0, 1], &[0, 0]));
        assert!(exclusion_matrix(&tiny_domain(), &h, BASE_YEAR).is_err());
    }
}

#[cfg(test)]
mod cost {
    use super::*;
    use crate::{
        CostComponent, DomainWaterRequirement, TransitionError, amortise, transition_cost_breakdown,
        transition_costs,
    };

    fn costs(settings: &Settings) -> crate::TransitionCosts {
        transition_cost_breakdown(
            &tiny_domain(),
            settings,
            &DomainWaterRequirement,
            &base_history(),
            BASE_YEAR,
            Year(2020),
        )
        .unwrap()
    }

    fn parts(c: &crate::TransitionCosts) -> &crate::CostBreakdown {
        c.breakdown.as_ref().unwrap()
    }

    #[test]
    fn dryland_to_irrigated_cropping_charges_licence_and_infrastructure() {
        let c = costs(&Settings::default());
        // +2 ML/ha at $50/ML plus $10 000/ha, area 1 ha, no establishment cost.
        let expected = amortise(2.0 * 50.0 + 10_000.0, 0.07, 30);
        assert!((parts(&c).water_mrj[[IRR, 0, WC]] - expected).abs() < 1e-9);
        assert!((c.t_mrj[[IRR, 0, WC]] - expected).abs() < 1e-9);
        assert_eq!(parts(&c).establishment_mrj[[IRR, 0, WC]], 0.0);
    }

    #[test]
    fn irrigated_to_dryland_saves_licence_but_pays_removal() {
        let c = costs(&Settings::default());
        let expected = amortise(-2.0 * 50.0 + 5_000.0, 0.07, 30);
        assert!((c.t_mrj[[DRY, 3, WC]] - expected).abs() < 1e-9);
    }

    #[test]
    fn establishment_scales_with_area() {
        let c = costs(&Settings::default());
        // Cell 1 (Beef - natural land, 2 ha) to dryland Winter cereals: $700/ha.
        let expected = amortise(700.0, 0.07, 30) * 2.0;
        assert!((parts(&c).establishment_mrj[[DRY, 1, WC]] - expected).abs() < 1e-9);
        assert!((c.t_mrj[[DRY, 1, WC]] - expected).abs() < 1e-9);
    }

    #[test]
    fn licence_switch_keeps_surcharges() {
        let mut s = Settings::default();
        s.economics.include_water_license_costs = false;
        let c = costs(&s);
        let expected = amortise(10_000.0, 0.07, 30);
        assert!((c.t_mrj[[IRR, 0, WC]] - expected).abs() < 1e-9);
        // Switching between dryland uses costs no water at all.
        assert_eq!(parts(&c).water_mrj[[DRY, 0, BM]], 0.0);
    }

    #[test]
    fn one_off_costs_skip_amortisation() {
        let mut s = Settings::default();
        s.economics.amortise_upfront_costs = false;
        let c = costs(&s);
        // Raw principal times area.
        assert!((c.t_mrj[[IRR, 0, WC]] - (2.0 * 50.0 + 10_000.0)).abs() < 1e-9);
        assert!((parts(&c).establishment_mrj[[DRY, 1, WC]] - 700.0 * 2.0).abs() < 1e-9);
        assert!((c.t_mrj[[DRY, 3, WC]] - (-2.0 * 50.0 + 5_000.0)).abs() < 1e-9);
    }

    #[test]
    fn parts_are_kept_only_on_request() {
        let lean = transition_costs(
            &tiny_domain(),
            &Settings::default(),
            &DomainWaterRequirement,
            &base_history(),
            BASE_YEAR,
            Year(2020),
        )
        .unwrap();
        let full = costs(&Settings::default());
        assert!(lean.breakdown.is_none());
        assert!(lean.component(CostComponent::Establishment).is_none());
        assert_eq!(lean.reported_components(), &[CostComponent::Total]);
        assert_eq!(full.reported_components(), &CostComponent::PARTS);

        // Same totals either way, and the parts add up to them where legal.
        let b = parts(&full);
        for ((idx, &t), &legal) in full.t_mrj.indexed_iter().zip(full.x_mrj.iter()) {
            let t_lean = lean.t_mrj[idx];
            if legal {
                assert!((t - t_lean).abs() < 1e-9);
                assert!((b.establishment_mrj[idx] + b.water_mrj[idx] - t).abs() < 1e-9);
            } else {
                assert!(t.is_nan() && t_lean.is_nan());
            }
        }
    }

    #[test]
    fn no_op_transition_is_free() {
        let c = costs(&Settings::default());
        assert_eq!(c.t_mrj[[DRY, 0, WC]], 0.0);
        assert_eq!(c.t_mrj[[DRY, 1, BN]], 0.0);
        assert_eq!(c.t_mrj[[DRY, 2, UN]], 0.0);
        assert_eq!(c.t_mrj[[IRR, 3, WC]], 0.0);
    }

    #[test]
    fn forbidden_is_nan_and_legal_cost_is_none() {
        let c = costs(&Settings::default());
        assert!(c.t_mrj[[DRY, 0, BN]].is_nan());
        assert!(c.component(CostComponent::Establishment).unwrap()[[DRY, 0, BN]].is_nan());
        assert!(!c.is_legal(LandMgmt::DRYLAND, 0, BN));
        assert_eq!(c.legal_cost(LandMgmt::DRYLAND, 0, BN), None);
        assert_eq!(c.legal_cost(LandMgmt::DRYLAND, 0, WC), Some(0.0));
        assert_eq!(c.filled(0.0)[[DRY, 0, BN]], 0.0);
    }

    #[test]
    fn non_agricultural_cells_cost_zero_where_legal() {
        let mut h = base_history();
        h.push(Year(2020), maps(&[100, 1, 2, 3], &[0, 0, 0, 1])).unwrap();
        let c = transition_costs(&tiny_domain(), &Settings::default(), &DomainWaterRequirement, &h, Year(2020), Year(2030))
            .unwrap();
        assert_eq!(c.t_mrj[[DRY, 0, WC]], 0.0);
        assert_eq!(c.t_mrj[[IRR, 0, BM]], 0.0);
        assert!(c.t_mrj[[DRY, 0, BN]].is_nan());
    }

    #[test]
    fn solve_year_must_follow_base() {
        let err = transition_costs(
            &tiny_domain(),
            &Settings::default(),
            &DomainWaterRequirement,
            &base_history(),
            BASE_YEAR,
            BASE_YEAR,
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::SolveYearOrder { .. }));
    }

    #[test]
    fn base_year_before_settings_base_is_fatal() {
        let h = LandUseHistory::new(Year(2005), tiny_base_maps());
        let err = transition_costs(&tiny_domain(), &Settings::default(), &DomainWaterRequirement, &h, Year(2005), Year(2020))
            .unwrap_err();
        assert!(matches!(err, TransitionError::Core(lu_core::CoreError::Settings(_))));
    }

    #[test]
    fn identical_inputs_give_identical_tensors() {
        let a = costs(&Settings::default());
        let b = costs(&Settings::default());
        let bits = |c: &crate::TransitionCosts| c.t_mrj.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.x_mrj, b.x_mrj);
    }
}

#[cfg(test)]
mod properties {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::{DomainWaterRequirement, legal_count, transition_costs};

    /// Random agricultural/non-agricultural maps over the fixture's four cells.
    fn random_maps(rng: &mut SmallRng) -> LandUseMaps {
        let codes: Vec<u16> = (0..4)
            .map(|_| if rng.gen_bool(0.2) { 100 + rng.gen_range(0..2) } else { rng.gen_range(0..4) })
            .collect();
        let lm: Vec<u8> = (0..4).map(|_| u8::from(rng.gen_bool(0.5))).collect();
        maps(&codes, &lm)
    }

    #[test]
    fn invariants_hold_for_random_histories() {
        let mut rng = SmallRng::seed_from_u64(7);
        let data = tiny_domain();
        let settings = Settings::default();

        for _ in 0..200 {
            let mut h = LandUseHistory::new(BASE_YEAR, random_maps(&mut rng));
            h.push(Year(2020), random_maps(&mut rng)).unwrap();
            let current = h.get(Year(2020)).unwrap().clone();
            let c = transition_costs(&data, &settings, &DomainWaterRequirement, &h, Year(2020), Year(2030))
                .unwrap();

            for (idx, &legal) in c.x_mrj.indexed_iter() {
                let t = c.t_mrj[idx];
                if legal {
                    assert!(t.is_finite(), "legal entry {idx:?} is {t}");
                } else {
                    assert!(t.is_nan(), "forbidden entry {idx:?} is {t}");
                }
            }
            for r in 0..current.n_cells() {
                if let Some((m, j)) = current.current_ag(r) {
                    assert_eq!(c.t_mrj[[m.index(), r, j.index()]], 0.0);
                    assert!(legal_count(&c.x_mrj, m, r) >= 1);
                }
            }
        }
    }
}
