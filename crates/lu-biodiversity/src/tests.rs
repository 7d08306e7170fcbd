//! Unit tests for lu-biodiversity.

use lu_core::{ConnectivitySource, LandMgmt, LandUseHistory, Settings, Year};
use lu_data::fixtures::{BASE_YEAR, tiny_base_maps, tiny_domain, tiny_taxonomy};
use lu_data::{DomainData, DomainDataBuilder};

fn base_history() -> LandUseHistory {
    LandUseHistory::new(BASE_YEAR, tiny_base_maps())
}

/// One cell of one hectare, no connectivity weighting, default habitat
/// shares (1 for natural land uses, 0 otherwise).
fn one_cell(priority: f64, savanna_eligible: bool) -> (DomainData, Settings) {
    let data = DomainDataBuilder::new(tiny_taxonomy(), vec![1.0])
        .bio_priority(vec![priority])
        .savanna_eligible(vec![savanna_eligible])
        .build()
        .unwrap();
    let mut settings = Settings::default();
    settings.biodiversity.connectivity_source = ConnectivitySource::None;
    settings.biodiversity.gbf2.enabled = false;
    (data, settings)
}

fn one_cell_history() -> LandUseHistory {
    let maps = lu_core::LandUseMaps::from_codes(&[2], &[0], &tiny_taxonomy()).unwrap();
    LandUseHistory::new(BASE_YEAR, maps)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

const DRY: usize = 0;
const IRR: usize = 1;
const BM: usize = 0;
const BN: usize = 1;
const UN: usize = 2;
const WC: usize = 3;

#[cfg(test)]
mod priority {
    use super::*;
    use crate::{connectivity_weight, fire_factor_r, raw_value_r};

    #[test]
    fn nci_weighting_has_lower_bound() {
        let w = connectivity_weight(&tiny_domain(), &Settings::default()).unwrap();
        assert!(close(w[0], 1.0));
        assert!(close(w[1], 0.85));
        let v = raw_value_r(&tiny_domain(), &Settings::default()).unwrap();
        assert!(close(v[1], 42.5));
    }

    #[test]
    fn no_connectivity_source_is_unweighted() {
        let mut s = Settings::default();
        s.biodiversity.connectivity_source = ConnectivitySource::None;
        let w = connectivity_weight(&tiny_domain(), &s).unwrap();
        assert!(w.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn unloaded_connectivity_source_is_fatal() {
        let mut s = Settings::default();
        s.biodiversity.connectivity_source = ConnectivitySource::Dwi;
        assert!(matches!(
            connectivity_weight(&tiny_domain(), &s),
            Err(crate::BiodiversityError::Data(lu_data::DataError::MissingLayer(_)))
        ));
    }

    #[test]
    fn fire_factor_only_on_eligible_cells() {
        let f = fire_factor_r(&tiny_domain(), &Settings::default());
        assert_eq!(f.to_vec(), vec![1.0, 0.8, 0.8, 1.0]);
    }
}

#[cfg(test)]
mod contributions {
    use lu_core::HabitatCondition;

    use super::*;
    use crate::{BiodiversityError, HabitatContributions, baseline_b_mrj, cell_value_r, non_ag_b_rk};

    #[test]
    fn baseline_composes_value_share_and_fire() {
        let data = tiny_domain();
        let s = Settings::default();
        let c = HabitatContributions::new(&data, &s).unwrap();
        let v = cell_value_r(&data, &s).unwrap();
        let b = baseline_b_mrj(&data, &c, &v);

        assert!(close(b[[DRY, 0, WC]], 10.0));
        assert!(close(b[[DRY, 1, BN]], 85.0 * 0.8 * 0.7));
        assert!(close(b[[IRR, 2, UN]], 48.0));
        assert_eq!(b.index_axis(ndarray::Axis(0), DRY), b.index_axis(ndarray::Axis(0), IRR));
        assert!(b.iter().all(|&x| x >= 0.0 && x.is_finite()));
    }

    #[test]
    fn non_agricultural_shares() {
        let data = tiny_domain();
        let s = Settings::default();
        let c = HabitatContributions::new(&data, &s).unwrap();
        // Environmental Plantings, then Destocked at the unallocated share.
        assert_eq!(c.non_ag_k.to_vec(), vec![0.8, 1.0]);

        let b = non_ag_b_rk(&c, &cell_value_r(&data, &s).unwrap());
        assert!(close(b[[0, 0]], 80.0));
        // No fire discount on non-agricultural land.
        assert!(close(b[[1, 1]], 85.0));
    }

    #[test]
    fn unknown_non_agricultural_use_contributes_nothing() {
        let tax = lu_core::LandUseTaxonomy::new(
            tiny_taxonomy().ag_names().to_vec(),
            vec!["Wetland restoration".to_owned()],
        )
        .unwrap();
        let data = DomainDataBuilder::new(tax, vec![1.0]).build().unwrap();
        let c = HabitatContributions::new(&data, &Settings::default()).unwrap();
        assert_eq!(c.non_ag_k.to_vec(), vec![0.0]);
    }

    #[test]
    fn no_habitat_condition_keeps_full_share() {
        let data = tiny_domain();
        let mut s = Settings::default();
        s.biodiversity.habitat_condition = HabitatCondition::None;
        let c = HabitatContributions::new(&data, &s).unwrap();
        let b = baseline_b_mrj(&data, &c, &cell_value_r(&data, &s).unwrap());
        assert!(close(b[[DRY, 0, WC]], 100.0));
        // The fire discount still applies.
        assert!(close(b[[DRY, 1, BN]], 85.0 * 0.8));
    }

    #[test]
    fn user_defined_condition_is_read_by_name() {
        let data = tiny_domain();
        let mut s = Settings::default();
        s.biodiversity.habitat_condition = HabitatCondition::UserDefined;
        let names = ["Beef - modified land", "Beef - natural land", "Unallocated - natural land"];
        for (name, v) in names.into_iter().zip([0.3, 0.6, 1.0]) {
            s.biodiversity.habitat_condition_user_defined.insert(name.to_owned(), v);
        }
        let err = HabitatContributions::new(&data, &s).unwrap_err();
        assert!(matches!(err, BiodiversityError::MissingContribution(name) if name == "Winter cereals"));

        s.biodiversity.habitat_condition_user_defined.insert("Winter cereals".to_owned(), 0.05);
        let c = HabitatContributions::new(&data, &s).unwrap();
        assert_eq!(c.ag_j.to_vec(), vec![0.3, 0.6, 1.0, 0.05]);
    }

    #[test]
    fn hcas_percentile_selects_the_layer() {
        let data = DomainDataBuilder::new(tiny_taxonomy(), vec![1.0])
            .hcas(10, vec![0.05, 0.4, 1.0, 0.0])
            .hcas(50, vec![0.2, 0.7, 1.0, 0.1])
            .build()
            .unwrap();
        let mut s = Settings::default();
        s.biodiversity.hcas_percentile = 10;
        let c = HabitatContributions::new(&data, &s).unwrap();
        assert_eq!(c.ag_j.to_vec(), vec![0.05, 0.4, 1.0, 0.0]);

        s.biodiversity.hcas_percentile = 90;
        let err = HabitatContributions::new(&data, &s).unwrap_err();
        assert!(matches!(err, BiodiversityError::Data(lu_data::DataError::MissingLayer(_))));
    }

    #[test]
    fn livestock_impact_penalises_grazed_natural_land() {
        let data = tiny_domain();
        let mut s = Settings::default();
        s.biodiversity.livestock_impact = 0.3;
        let c = HabitatContributions::new(&data, &s).unwrap();
        assert_eq!(c.penalty_j.to_vec(), vec![0.0, 0.3, 0.0, 0.0]);

        let b = baseline_b_mrj(&data, &c, &cell_value_r(&data, &s).unwrap());
        assert!(close(b[[DRY, 1, BN]], 85.0 * (0.7 * 0.8 - 0.3)));
        // Modified-land beef and unallocated land are not penalised.
        assert!(close(b[[DRY, 0, BM]], 20.0));
        assert!(close(b[[DRY, 2, UN]], 48.0));

        let f = c.fractions_for(&tiny_base_maps()).unwrap();
        assert!(close(f[1], 0.26));
    }

    #[test]
    fn livestock_penalty_floors_at_zero() {
        let data = tiny_domain();
        let mut s = Settings::default();
        s.biodiversity.livestock_impact = 1.0;
        let c = HabitatContributions::new(&data, &s).unwrap();
        assert_eq!(c.ag_fraction(1, lu_core::AgLandUse(BN as u16)), 0.0);
        let b = baseline_b_mrj(&data, &c, &cell_value_r(&data, &s).unwrap());
        assert!(b.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn fractions_follow_the_map() {
        let data = tiny_domain();
        let c = HabitatContributions::new(&data, &Settings::default()).unwrap();
        let f = c.fractions_for(&tiny_base_maps()).unwrap();
        let expected = [0.1, 0.56, 0.8, 0.1];
        for (got, want) in f.iter().zip(expected) {
            assert!(close(*got, want), "{got} != {want}");
        }
    }
}

#[cfg(test)]
mod overlays {
    use lu_core::AgManagement;

    use super::*;
    use crate::{HabitatContributions, baseline_b_mrj, cell_value_r, overlay_effects};

    fn effects(data: &DomainData, s: &Settings, year: Year) -> (ndarray::Array3<f64>, crate::OverlayEffects) {
        let c = HabitatContributions::new(data, s).unwrap();
        let v = cell_value_r(data, s).unwrap();
        (baseline_b_mrj(data, &c, &v), overlay_effects(data, s, &c, &v, year))
    }

    #[test]
    fn savanna_burning_restores_full_value() {
        let (data, s) = one_cell(100.0, true);
        let (b, fx) = effects(&data, &s, Year(2020));
        let sav = fx.get(AgManagement::SavannaBurning).unwrap();

        assert!(close(b[[DRY, 0, UN]], 80.0));
        let delta = sav.delta(LandMgmt::DRYLAND, 0, lu_core::AgLandUse(UN as u16));
        assert!(close(delta, 20.0));
        assert!(close(b[[DRY, 0, UN]] + delta, 100.0));
    }

    #[test]
    fn savanna_burning_is_zero_off_eligible_cells() {
        let (data, s) = one_cell(100.0, false);
        let (_, fx) = effects(&data, &s, Year(2020));
        let sav = fx.get(AgManagement::SavannaBurning).unwrap();
        assert!(sav.delta_mrj.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn hir_resets_to_penalised_unallocated_value() {
        let (data, s) = one_cell(60.0, false);
        let (b, fx) = effects(&data, &s, Year(2020));
        assert!(close(b[[DRY, 0, UN]], 60.0));

        let hir = fx.get(AgManagement::BeefHir).unwrap();
        assert_eq!(hir.land_uses, vec![lu_core::AgLandUse(BN as u16)]);
        let adjusted = b[[DRY, 0, BN]] + hir.delta_mrj[[DRY, 0, 0]];
        assert!(close(adjusted, 30.0));
    }

    #[test]
    fn hir_ignores_livestock_penalty_of_the_land_it_replaces() {
        let (data, mut s) = one_cell(60.0, false);
        s.biodiversity.livestock_impact = 0.4;
        let (b, fx) = effects(&data, &s, Year(2020));
        assert!(close(b[[DRY, 0, BN]], 60.0 * 0.6));

        let hir = fx.get(AgManagement::BeefHir).unwrap();
        assert!(close(hir.fraction_rj[[0, 0]], 0.5 - 0.6));
        assert!(close(b[[DRY, 0, BN]] + hir.delta_mrj[[DRY, 0, 0]], 30.0));
    }

    #[test]
    fn delta_is_value_times_fraction_change() {
        let data = tiny_domain();
        let s = Settings::default();
        let (_, fx) = effects(&data, &s, Year(2050));
        let v = cell_value_r(&data, &s).unwrap();
        for effect in fx.iter() {
            for ((m, r, jj), &d) in effect.delta_mrj.indexed_iter() {
                assert!(close(d, v[r] * effect.fraction_rj[[r, jj]]), "{} at ({m}, {r}, {jj})", effect.management);
            }
        }
        // Savanna cells 1 and 2 regain the fire discount.
        let sav = fx.get(AgManagement::SavannaBurning).unwrap();
        for (r, want) in [0.0, 0.2, 0.2, 0.0].into_iter().enumerate() {
            assert!(close(sav.fraction_rj[[r, 0]], want));
        }
    }

    #[test]
    fn biochar_follows_multiplier_steps() {
        let data = tiny_domain();
        let s = Settings::default();

        let (_, before) = effects(&data, &s, Year(2020));
        assert!(before.get(AgManagement::Biochar).unwrap().delta_mrj.iter().all(|&d| d == 0.0));

        let (b, after) = effects(&data, &s, Year(2040));
        let bc = after.get(AgManagement::Biochar).unwrap();
        let wc = lu_core::AgLandUse(WC as u16);
        assert!(close(bc.delta(LandMgmt::DRYLAND, 0, wc), b[[DRY, 0, WC]] * 0.2));
    }

    #[test]
    fn disabled_overlay_keeps_shape_with_zeros() {
        let data = tiny_domain();
        let mut s = Settings::default();
        s.ag_managements.savanna_burning = false;
        let (_, fx) = effects(&data, &s, Year(2020));
        let sav = fx.get(AgManagement::SavannaBurning).unwrap();
        assert!(!sav.enabled);
        assert_eq!(sav.delta_mrj.dim(), (LandMgmt::COUNT, 4, 2));
        assert!(sav.delta_mrj.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn no_effect_overlays_are_zero() {
        let (_, fx) = effects(&tiny_domain(), &Settings::default(), Year(2020));
        assert_eq!(fx.len(), AgManagement::ALL.len());
        for am in [AgManagement::Asparagopsis, AgManagement::EcologicalGrazing, AgManagement::AgTechEi] {
            assert!(fx.get(am).unwrap().delta_mrj.iter().all(|&d| d == 0.0), "{am}");
        }
    }

    #[test]
    fn baseline_plus_delta_is_non_negative() {
        let data = tiny_domain();
        let s = Settings::default();
        let (b, fx) = effects(&data, &s, Year(2050));
        for effect in fx.iter() {
            for (jj, j) in effect.land_uses.iter().enumerate() {
                for m in 0..LandMgmt::COUNT {
                    for r in 0..data.n_cells() {
                        let total = b[[m, r, j.index()]] + effect.delta_mrj[[m, r, jj]];
                        assert!(total >= -1e-9, "{} at ({m}, {r}, {jj}) = {total}", effect.management);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod frameworks {
    use lu_core::BiodiversityFramework;

    use super::*;
    use crate::{BiodiversityError, GBF2_CATEGORY, biodiversity_matrices, priority_degraded_mask};

    #[test]
    fn gbf2_mask_takes_top_half_of_degraded_area() {
        let data = tiny_domain();
        let s = Settings::default();
        let c = crate::HabitatContributions::new(&data, &s).unwrap();
        let v = crate::cell_value_r(&data, &s).unwrap();
        let mask = priority_degraded_mask(&data, &c, &v, &tiny_base_maps(), 50.0).unwrap();
        assert_eq!(mask.to_vec(), vec![true, false, true, true]);

        let none = priority_degraded_mask(&data, &c, &v, &tiny_base_maps(), 0.0).unwrap();
        assert!(none.iter().all(|&b| !b));
        let all = priority_degraded_mask(&data, &c, &v, &tiny_base_maps(), 100.0).unwrap();
        assert!(all.iter().all(|&b| b));
    }

    #[test]
    fn gbf2_layer_is_value_on_masked_cells() {
        let m = biodiversity_matrices(&tiny_domain(), &Settings::default(), &base_history(), Year(2020)).unwrap();
        let gbf2 = m.framework(BiodiversityFramework::Gbf2).unwrap();
        assert_eq!(gbf2.names, vec![GBF2_CATEGORY.to_owned()]);
        assert_eq!(gbf2.layer_vr.row(0).to_vec(), vec![100.0, 0.0, 60.0, 80.0]);
        assert!(close(gbf2.max_scores()[0], 240.0));
    }

    #[test]
    fn gbf3_layers_scale_by_area_and_score_the_map() {
        let mut s = Settings::default();
        s.biodiversity.gbf3_enabled = true;
        let m = biodiversity_matrices(&tiny_domain(), &s, &base_history(), Year(2020)).unwrap();
        let gbf3 = m.framework(BiodiversityFramework::Gbf3).unwrap();
        assert_eq!(gbf3.layer_vr.row(0).to_vec(), vec![0.0, 1.0, 0.5, 0.0]);

        let scores = gbf3.scores_for(&m.contributions, &tiny_base_maps()).unwrap();
        assert!(close(scores[0], 0.96));
        assert!(close(scores[1], 0.1));
    }

    #[test]
    fn gbf8_layers_interpolate_between_anchors() {
        let mut s = Settings::default();
        s.biodiversity.gbf8_groups_enabled = true;
        let m = biodiversity_matrices(&tiny_domain(), &s, &base_history(), Year(2030)).unwrap();
        let gbf8 = m.framework(BiodiversityFramework::Gbf8Groups).unwrap();
        // Halfway between 2010 and 2050, cell 1 has area 2.
        assert!(close(gbf8.layer_vr[[0, 0]], 0.5));
        assert!(close(gbf8.layer_vr[[0, 1]], 1.0));
    }

    #[test]
    fn disabled_framework_is_empty_not_an_error() {
        let m = biodiversity_matrices(&tiny_domain(), &Settings::default(), &base_history(), Year(2020)).unwrap();
        let snes = m.framework(BiodiversityFramework::Gbf4Snes).unwrap();
        assert!(snes.is_empty());
        assert_eq!(snes.layer_vr.dim(), (0, 4));
        assert_eq!(snes.max_scores().len(), 0);
        let scores = snes.scores_for(&m.contributions, &tiny_base_maps()).unwrap();
        assert_eq!(scores.len(), 0);
        assert_eq!(m.frameworks.len(), BiodiversityFramework::ALL.len());
    }

    #[test]
    fn enabled_framework_without_data_is_fatal() {
        let mut s = Settings::default();
        s.biodiversity.gbf4_ecnes_enabled = true;
        let err = biodiversity_matrices(&tiny_domain(), &s, &base_history(), Year(2020)).unwrap_err();
        assert!(matches!(err, BiodiversityError::MissingFramework("GBF4-ECNES")));
    }

    #[test]
    fn single_cell_domain_builds() {
        let (data, s) = one_cell(10.0, false);
        let m = biodiversity_matrices(&data, &s, &one_cell_history(), Year(2020)).unwrap();
        assert_eq!(m.b_mrj.dim(), (LandMgmt::COUNT, 1, 4));
        assert!(m.frameworks.iter().all(|f| f.is_empty()));
    }

    #[test]
    fn identical_inputs_give_identical_tensors() {
        let a = biodiversity_matrices(&tiny_domain(), &Settings::default(), &base_history(), Year(2050)).unwrap();
        let b = biodiversity_matrices(&tiny_domain(), &Settings::default(), &base_history(), Year(2050)).unwrap();
        let bits = |x: &ndarray::Array3<f64>| x.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.b_mrj), bits(&b.b_mrj));
    }
}

#[cfg(test)]
mod allocated {
    use std::collections::BTreeMap;

    use ndarray::{Array2, Array3};

    use lu_core::{AgManagement, BiodiversityFramework};

    use super::*;
    use crate::{BiodiversityError, BiodiversityMatrices, biodiversity_matrices};

    fn matrices() -> BiodiversityMatrices {
        biodiversity_matrices(&tiny_domain(), &Settings::default(), &base_history(), Year(2020)).unwrap()
    }

    /// Every cell held at its base-year use.
    fn held() -> (Array3<f64>, Array2<f64>) {
        let ag_mrj = tiny_base_maps().l_mrj(4).mapv(|b| if b { 1.0 } else { 0.0 });
        (ag_mrj, Array2::zeros((4, 2)))
    }

    fn gbf2_achieved(m: &BiodiversityMatrices, fraction_r: &ndarray::Array1<f64>) -> f64 {
        m.framework(BiodiversityFramework::Gbf2).unwrap().scores(fraction_r)[0]
    }

    #[test]
    fn held_allocation_matches_the_map() {
        let m = matrices();
        let (ag_mrj, non_ag_rk) = held();
        let f = m.allocated_fraction_r(&ag_mrj, &non_ag_rk, &BTreeMap::new()).unwrap();
        let from_map = m.contributions.fractions_for(&tiny_base_maps()).unwrap();
        for (a, b) in f.iter().zip(from_map.iter()) {
            assert!(close(*a, *b));
        }
        assert!(close(gbf2_achieved(&m, &f), 66.0));
    }

    #[test]
    fn fractional_shares_are_blended() {
        let m = matrices();
        let (mut ag_mrj, mut non_ag_rk) = held();
        // Cell 0: 60 % Environmental Plantings, 40 % dryland Winter cereals.
        ag_mrj[[DRY, 0, WC]] = 0.4;
        non_ag_rk[[0, 0]] = 0.6;
        let f = m.allocated_fraction_r(&ag_mrj, &non_ag_rk, &BTreeMap::new()).unwrap();
        assert!(close(f[0], 0.6 * 0.8 + 0.4 * 0.1));
        assert!(close(gbf2_achieved(&m, &f), 52.0 + 48.0 + 8.0));
    }

    #[test]
    fn savanna_burning_restores_the_fire_discount() {
        let m = matrices();
        let (ag_mrj, non_ag_rk) = held();
        let sav = m.overlays.get(AgManagement::SavannaBurning).unwrap();
        let jj = sav.land_uses.iter().position(|j| j.index() == UN).unwrap();
        let mut x = Array3::zeros((LandMgmt::COUNT, 4, sav.land_uses.len()));
        x[[DRY, 2, jj]] = 1.0;
        let ag_man = BTreeMap::from([(AgManagement::SavannaBurning, x)]);

        let f = m.allocated_fraction_r(&ag_mrj, &non_ag_rk, &ag_man).unwrap();
        assert!(close(f[2], 1.0));
        assert!(close(gbf2_achieved(&m, &f), 66.0 + 12.0));
    }

    #[test]
    fn hir_takes_the_penalised_unallocated_value() {
        let m = matrices();
        let (ag_mrj, non_ag_rk) = held();
        let hir = m.overlays.get(AgManagement::BeefHir).unwrap();
        let mut x = Array3::zeros((LandMgmt::COUNT, 4, hir.land_uses.len()));
        x[[DRY, 1, 0]] = 0.5;
        let ag_man = BTreeMap::from([(AgManagement::BeefHir, x)]);

        let f = m.allocated_fraction_r(&ag_mrj, &non_ag_rk, &ag_man).unwrap();
        // Half the cell at 0.56, half at fire 0.8 · 1.0 · (1 − 0.5).
        assert!(close(f[1], 0.5 * 0.56 + 0.5 * 0.4));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let m = matrices();
        let (ag_mrj, _) = held();
        let err = m.allocated_fraction_r(&ag_mrj, &Array2::zeros((4, 3)), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, BiodiversityError::ShapeMismatch { ref what, .. } if what == "non_ag_rk"));

        let ag_man = BTreeMap::from([(AgManagement::Biochar, Array3::zeros((LandMgmt::COUNT, 4, 7)))]);
        let err = m.allocated_fraction_r(&ag_mrj, &Array2::zeros((4, 2)), &ag_man).unwrap_err();
        assert!(matches!(err, BiodiversityError::ShapeMismatch { .. }));
    }
}
