//! Unit tests for lu-targets.

use lu_core::{BiodiversityFramework, LandUseHistory, Settings, Year};
use lu_data::fixtures::{BASE_YEAR, tiny_base_maps, tiny_domain};

fn base_history() -> LandUseHistory {
    LandUseHistory::new(BASE_YEAR, tiny_base_maps())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[cfg(test)]
mod biodiversity {
    use ndarray::array;

    use super::*;
    use crate::{FrameworkLimits, biodiversity_limits};

    fn limits(settings: &Settings, fw: BiodiversityFramework, year: Year) -> FrameworkLimits {
        biodiversity_limits(&tiny_domain(), settings, &base_history(), year)
            .unwrap()
            .into_iter()
            .find(|l| l.framework == fw)
            .unwrap()
    }

    #[test]
    fn gbf2_moves_from_base_towards_full_restoration() {
        let s = Settings::default();
        let at = |yr| limits(&s, BiodiversityFramework::Gbf2, Year(yr));
        // Base 66 of a possible 240 over the selected cells.
        assert!(close(at(2010).limit_v[0], 66.0));
        assert!(close(at(2020).limit_v[0], 66.0 + 0.15 * 174.0));
        assert!(close(at(2030).limit_v[0], 66.0 + 0.3 * 174.0));
        assert!(close(at(2080).limit_v[0], 66.0 + 0.5 * 174.0));
        assert!(close(at(2030).all_v[0], 240.0));
        assert!(close(at(2030).target_pct_v()[0], 118.2 / 240.0 * 100.0));
    }

    #[test]
    fn score_framework_interpolates_from_base_percentage() {
        let mut s = Settings::default();
        s.biodiversity.gbf3_enabled = true;
        let l = limits(&s, BiodiversityFramework::Gbf3, Year(2030));

        assert!(close(l.base_pct_v[0], 10.96));
        assert!(close(l.base_pct_v[1], 0.2));
        assert!(close(l.limit_v[0], 20.0));
        assert!(close(l.limit_v[1], 5.05));

        let pct = l.percentage(&array![20.0, 5.05]);
        assert!(close(pct[0], 30.0));
        assert!(close(pct[1], 10.1));
    }

    #[test]
    fn targets_hold_after_last_anchor() {
        let mut s = Settings::default();
        s.biodiversity.gbf3_enabled = true;
        let l = limits(&s, BiodiversityFramework::Gbf3, Year(2070));
        assert!(close(l.limit_v[0], 40.0));
        assert!(close(l.limit_v[1], 10.0));
    }

    #[test]
    fn species_target_counts_outside_study_area() {
        let mut s = Settings::default();
        s.biodiversity.gbf4_snes_enabled = true;
        let l = limits(&s, BiodiversityFramework::Gbf4Snes, Year(2050));
        assert_eq!(l.names, vec!["Northern Quoll".to_owned()]);
        assert!(close(l.base_pct_v[0], 29.96));
        // 40 % of 20, less 5 outside.
        assert!(close(l.limit_v[0], 3.0));
    }

    #[test]
    fn limit_never_negative_and_untargeted_category_holds() {
        let mut s = Settings::default();
        s.biodiversity.gbf8_groups_enabled = true;
        let l = limits(&s, BiodiversityFramework::Gbf8Groups, Year(2050));
        // Birds: 30 % of 10 is below the 4 already outside.
        assert_eq!(l.limit_v[0], 0.0);
        // Frogs: no target; base 8 % of 10 with nothing outside.
        assert!(close(l.limit_v[1], 0.8));
    }

    #[test]
    fn disabled_framework_resolves_empty() {
        let l = limits(&Settings::default(), BiodiversityFramework::Gbf4Snes, Year(2030));
        assert!(l.is_empty());
        assert_eq!(l.limit_v.len(), 0);
        assert_eq!(l.percentage(&ndarray::Array1::zeros(0)).len(), 0);
        assert_eq!(l.iter().count(), 0);
    }

    #[test]
    fn disabling_gbf2_empties_it() {
        let mut s = Settings::default();
        s.biodiversity.gbf2.enabled = false;
        assert!(limits(&s, BiodiversityFramework::Gbf2, Year(2030)).is_empty());
    }
}

#[cfg(test)]
mod water {
    use lu_core::WaterRegionDef;

    use super::*;
    use crate::{TargetError, water_limits};

    #[test]
    fn limits_scale_historical_yield() {
        let w = water_limits(&tiny_domain(), &Settings::default()).unwrap().unwrap();
        assert_eq!(w.region_def, WaterRegionDef::DrainageDivision);
        let mdb = w.get(1).unwrap();
        assert_eq!(mdb.name, "Murray-Darling Basin");
        assert_eq!(mdb.cells, vec![0, 1, 2]);
        assert!(close(mdb.limit, 720.0));
        assert!(close(w.get(2).unwrap().limit, 288.0));
    }

    #[test]
    fn switched_off_is_none() {
        let mut s = Settings::default();
        s.water.limits_enabled = false;
        assert!(water_limits(&tiny_domain(), &s).unwrap().is_none());
    }

    #[test]
    fn unloaded_regionalisation_is_fatal() {
        let mut s = Settings::default();
        s.water.region_def = WaterRegionDef::RiverRegion;
        assert!(matches!(
            water_limits(&tiny_domain(), &s),
            Err(TargetError::Data(lu_data::DataError::MissingLayer(_)))
        ));
    }
}

#[cfg(test)]
mod ghg {
    use lu_core::GhgLimitsType;

    use super::*;
    use crate::{TargetError, ghg_limit};

    #[test]
    fn dict_interpolates_and_holds() {
        let s = Settings::default();
        let d = tiny_domain();
        assert_eq!(ghg_limit(&d, &s, Year(2010)).unwrap(), Some(90.0e6));
        assert!(close(ghg_limit(&d, &s, Year(2030)).unwrap().unwrap(), -5.0e6));
        assert_eq!(ghg_limit(&d, &s, Year(2200)).unwrap(), Some(-100.0e6));
    }

    #[test]
    fn file_is_exact_lookup() {
        let mut s = Settings::default();
        s.ghg.limits_type = GhgLimitsType::File;
        let d = tiny_domain();
        assert_eq!(ghg_limit(&d, &s, Year(2030)).unwrap(), Some(5.0e5));
        assert!(matches!(ghg_limit(&d, &s, Year(2020)), Err(TargetError::MissingGhgYear(Year(2020)))));
    }

    #[test]
    fn file_follows_limits_field() {
        let mut s = Settings::default();
        s.ghg.limits_type = GhgLimitsType::File;
        s.ghg.limits_field = "1.8C (67%) excl. avoided emis".to_owned();
        let d = tiny_domain();
        assert_eq!(ghg_limit(&d, &s, Year(2010)).unwrap(), Some(1.2e6));
        assert_eq!(ghg_limit(&d, &s, Year(2030)).unwrap(), Some(8.0e5));
    }

    #[test]
    fn file_with_unknown_field_is_fatal() {
        let mut s = Settings::default();
        s.ghg.limits_type = GhgLimitsType::File;
        s.ghg.limits_field = "2C (50%) excl. avoided emis".to_owned();
        let err = ghg_limit(&tiny_domain(), &s, Year(2030)).unwrap_err();
        assert!(matches!(err, TargetError::MissingGhgField(f) if f == "2C (50%) excl. avoided emis"));
    }

    #[test]
    fn file_without_table_is_fatal() {
        let mut s = Settings::default();
        s.ghg.limits_type = GhgLimitsType::File;
        let mut d = tiny_domain();
        d.ghg_limit_table = None;
        assert!(matches!(ghg_limit(&d, &s, Year(2030)), Err(TargetError::MissingGhgTable)));
    }

    #[test]
    fn switched_off_is_none() {
        let mut s = Settings::default();
        s.ghg.limits_enabled = false;
        assert_eq!(ghg_limit(&tiny_domain(), &s, Year(2030)).unwrap(), None);
    }
}

#[cfg(test)]
mod limits {
    use super::*;
    use crate::resolve_limits;

    #[test]
    fn bundle_has_every_framework() {
        let l = resolve_limits(&tiny_domain(), &Settings::default(), &base_history(), Year(2030)).unwrap();
        assert_eq!(l.biodiversity.len(), BiodiversityFramework::ALL.len());
        assert!(!l.framework(BiodiversityFramework::Gbf2).unwrap().is_empty());
        assert!(l.framework(BiodiversityFramework::Gbf3).unwrap().is_empty());
        assert!(l.water.is_some());
        assert!(l.ghg.is_some());
    }
}
