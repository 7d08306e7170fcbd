//! A four-cell reference domain for tests and demos.
//!
//! Land uses (lexicographic):
//!
//! | j | name                         | habitat |
//! |---|------------------------------|---------|
//! | 0 | Beef - modified land         | 0.2     |
//! | 1 | Beef - natural land          | 0.7     |
//! | 2 | Unallocated - natural land   | 1.0     |
//! | 3 | Winter cereals               | 0.1     |
//!
//! Non-agricultural: `0` Environmental Plantings, `1` Destocked - natural land.
//!
//! | r | base-year use         | lm  | area | priority | savanna |
//! |---|-----------------------|-----|------|----------|---------|
//! | 0 | Winter cereals        | dry | 1    | 100      | no      |
//! | 1 | Beef - natural land   | dry | 2    | 50       | yes     |
//! | 2 | Unallocated - natural | dry | 1    | 60       | yes     |
//! | 3 | Winter cereals        | irr | 1    | 80       | no      |

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3, array};

use lu_core::{
    AgLandUse, BiodiversityFramework, LandMgmt, LandUseMaps, LandUseTaxonomy, TargetTimeline, Year,
};

use crate::{
    BiocharMultipliers, DomainData, DomainDataBuilder, GhgLimitTable, ScoreFrameworkData, WaterRegions,
    YearSeries,
};

pub const BASE_YEAR: Year = Year(2010);

pub const BEEF_MODIFIED: AgLandUse = AgLandUse(0);
pub const BEEF_NATURAL: AgLandUse = AgLandUse(1);
pub const UNALLOCATED_NATURAL: AgLandUse = AgLandUse(2);
pub const WINTER_CEREALS: AgLandUse = AgLandUse(3);

pub fn tiny_taxonomy() -> LandUseTaxonomy {
    match LandUseTaxonomy::new(
        ["Beef - modified land", "Beef - natural land", "Unallocated - natural land", "Winter cereals"],
        ["Environmental Plantings", "Destocked - natural land"],
    ) {
        Ok(t) => t,
        Err(e) => panic!("fixture taxonomy is valid: {e}"),
    }
}

/// Base-year land-use maps of the fixture domain.
pub fn tiny_base_maps() -> LandUseMaps {
    match LandUseMaps::from_codes(&[3, 1, 2, 3], &[0, 0, 0, 1], &tiny_taxonomy()) {
        Ok(m) => m,
        Err(e) => panic!("fixture maps are valid: {e}"),
    }
}

/// Raw establishment costs, $/ha.  NaN marks a disallowed transition.
pub fn tiny_transition_table() -> Array2<f64> {
    let nan = f64::NAN;
    array![
        // to:  BM     BN     UN     WC
        [0.0, nan, 0.0, 500.0],   // from Beef - modified land
        [200.0, 0.0, 0.0, 700.0], // from Beef - natural land
        [300.0, 100.0, 0.0, 900.0], // from Unallocated - natural land
        [400.0, nan, 0.0, 0.0],   // from Winter cereals
    ]
}

pub fn tiny_domain() -> DomainData {
    let n_cells = 4;
    let tax = tiny_taxonomy();

    // Irrigation is only possible for modified-land grazing and cropping.
    let mut x_mrj = Array3::from_elem((LandMgmt::COUNT, n_cells, tax.n_ag()), true);
    for j in [BEEF_NATURAL, UNALLOCATED_NATURAL] {
        x_mrj.slice_mut(ndarray::s![1, .., j.index()]).fill(false);
    }

    let mut w_mrj = Array3::zeros((LandMgmt::COUNT, n_cells, tax.n_ag()));
    w_mrj.slice_mut(ndarray::s![1, .., BEEF_MODIFIED.index()]).fill(1.0);
    w_mrj.slice_mut(ndarray::s![1, .., WINTER_CEREALS.index()]).fill(2.0);

    let mut biochar = BiocharMultipliers::default();
    biochar.insert(Year(2030), WINTER_CEREALS, 1.2);

    let regions = WaterRegions {
        region_r:         vec![1, 1, 1, 2],
        names:            [(1, "Murray-Darling Basin".to_owned()), (2, "South East Coast".to_owned())]
            .into_iter()
            .collect(),
        historical_yield: [(1, 1_000.0), (2, 400.0)].into_iter().collect(),
    };

    match DomainDataBuilder::new(tax, vec![1.0, 2.0, 1.0, 1.0])
        .static_exclusion(x_mrj)
        .bio_priority(vec![100.0, 50.0, 60.0, 80.0])
        .connectivity_nci(vec![1.0, 0.5, 1.0, 1.0])
        .savanna_eligible(vec![false, true, true, false])
        .water_licence_price(vec![50.0; n_cells])
        .drainage_divisions(regions)
        .ag_transition_costs(tiny_transition_table())
        .water_requirement(w_mrj)
        .ag_habitat_contribution(vec![0.2, 0.7, 1.0, 0.1])
        .biochar(biochar)
        .framework(BiodiversityFramework::Gbf3, tiny_gbf3(n_cells))
        .framework(BiodiversityFramework::Gbf4Snes, tiny_snes(n_cells))
        .framework(BiodiversityFramework::Gbf8Groups, tiny_gbf8_groups(n_cells))
        .ghg_limit_table(tiny_ghg_limits())
        .build()
    {
        Ok(d) => d,
        Err(e) => panic!("fixture domain is valid: {e}"),
    }
}

/// Two GHG limit scenarios, tCO2e.  The first is the default
/// `ghg.limits_field`.
pub fn tiny_ghg_limits() -> GhgLimitTable {
    let mut table = GhgLimitTable::from_scenario(
        "1.5C (67%) excl. avoided emis",
        [(Year(2010), 1.0e6), (Year(2030), 5.0e5)].into_iter().collect(),
    );
    table.insert(
        "1.8C (67%) excl. avoided emis",
        [(Year(2010), 1.2e6), (Year(2030), 8.0e5)].into_iter().collect(),
    );
    table
}

// ── Frameworks ────────────────────────────────────────────────────────────────

fn single_year<D: ndarray::Dimension>(values: ndarray::Array<f64, D>) -> YearSeries<D> {
    YearSeries::constant(BASE_YEAR, values)
}

/// Two vegetation groups.  Group 0 lives on cells 1 and 2; group 1 on 0 and 3.
fn tiny_gbf3(n_cells: usize) -> ScoreFrameworkData {
    let layers = array![[0.0, 0.5, 0.5, 0.0], [0.25, 0.0, 0.0, 0.75]];
    assert_eq!(layers.ncols(), n_cells);
    fixture_framework(
        vec!["Eucalypt Woodlands".into(), "Tussock Grasslands".into()],
        single_year(layers),
        single_year(array![10.0, 0.0]),
        single_year(array![100.0, 50.0]),
        vec![
            TargetTimeline::from_pairs([(2030, 30.0), (2050, 50.0)]),
            TargetTimeline::from_pairs([(2050, 20.0)]),
        ],
        n_cells,
    )
}

/// One threatened species, present on cells 1 and 2.
fn tiny_snes(n_cells: usize) -> ScoreFrameworkData {
    fixture_framework(
        vec!["Northern Quoll".into()],
        single_year(array![[0.0, 0.6, 0.4, 0.0]]),
        single_year(array![5.0]),
        single_year(array![20.0]),
        vec![TargetTimeline::from_pairs([(2050, 40.0)])],
        n_cells,
    )
}

/// Two climate-resilience groups whose layers shift between 2010 and 2050.
fn tiny_gbf8_groups(n_cells: usize) -> ScoreFrameworkData {
    let layers: BTreeMap<Year, Array2<f64>> = [
        (Year(2010), array![[1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]]),
        (Year(2050), array![[0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 1.0]]),
    ]
    .into_iter()
    .collect();
    let outside: BTreeMap<Year, Array1<f64>> =
        [(Year(2010), array![2.0, 0.0]), (Year(2050), array![4.0, 0.0])].into_iter().collect();
    let layers = match YearSeries::new(layers, "gbf8 layers") {
        Ok(s) => s,
        Err(e) => panic!("fixture layers are valid: {e}"),
    };
    let outside = match YearSeries::new(outside, "gbf8 outside") {
        Ok(s) => s,
        Err(e) => panic!("fixture baselines are valid: {e}"),
    };
    fixture_framework(
        vec!["Birds".into(), "Frogs".into()],
        layers,
        outside,
        single_year(array![10.0, 10.0]),
        vec![TargetTimeline::from_pairs([(2050, 30.0)]), TargetTimeline::default()],
        n_cells,
    )
}

fn fixture_framework(
    names:   Vec<String>,
    layers:  YearSeries<ndarray::Ix2>,
    outside: YearSeries<ndarray::Ix1>,
    all:     YearSeries<ndarray::Ix1>,
    targets: Vec<TargetTimeline>,
    n_cells: usize,
) -> ScoreFrameworkData {
    match ScoreFrameworkData::new(names, layers, outside, all, targets, n_cells) {
        Ok(d) => d,
        Err(e) => panic!("fixture framework is valid: {e}"),
    }
}
