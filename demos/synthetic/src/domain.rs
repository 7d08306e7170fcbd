//! Random landscape over the fixture taxonomy.

use anyhow::Result;
use ndarray::Array3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lu_core::{LandMgmt, LandUseMaps};
use lu_data::fixtures::{BEEF_MODIFIED, WINTER_CEREALS, tiny_taxonomy, tiny_transition_table};
use lu_data::{DomainData, DomainDataBuilder, WaterRegions};

/// Share of irrigable cells that start irrigated.
const IRRIGATED_SHARE: f64 = 0.2;

pub fn build_domain(n_cells: usize, seed: u64) -> Result<(DomainData, LandUseMaps)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let tax = tiny_taxonomy();
    let n_ag = tax.n_ag();

    // Starting land use.  Only modified-land grazing and cropping irrigate.
    let mut lu_codes = Vec::with_capacity(n_cells);
    let mut lm_codes = Vec::with_capacity(n_cells);
    for _ in 0..n_cells {
        let j = rng.gen_range(0..n_ag as u16);
        let irrigable = j == BEEF_MODIFIED.0 || j == WINTER_CEREALS.0;
        lu_codes.push(j);
        lm_codes.push(u8::from(irrigable && rng.gen_bool(IRRIGATED_SHARE)));
    }
    let base_maps = LandUseMaps::from_codes(&lu_codes, &lm_codes, &tax)?;

    let mut x_mrj = Array3::from_elem((LandMgmt::COUNT, n_cells, n_ag), false);
    let mut w_mrj = Array3::zeros((LandMgmt::COUNT, n_cells, n_ag));
    for r in 0..n_cells {
        for j in 0..n_ag {
            x_mrj[[LandMgmt::DRYLAND.index(), r, j]] = true;
        }
        for (j, ml_per_ha) in [(BEEF_MODIFIED, 1.0), (WINTER_CEREALS, 2.0)] {
            x_mrj[[LandMgmt::IRRIGATED.index(), r, j.index()]] = true;
            w_mrj[[LandMgmt::IRRIGATED.index(), r, j.index()]] = ml_per_ha * rng.gen_range(0.5..1.5);
        }
    }

    // Two drainage divisions split west/east.
    let half = n_cells / 2;
    let region_r: Vec<u16> = (0..n_cells).map(|r| if r < half { 1 } else { 2 }).collect();
    let regions = WaterRegions {
        region_r,
        names:            [(1, "Western".to_owned()), (2, "Eastern".to_owned())].into_iter().collect(),
        historical_yield: [(1, 50.0 * half as f64), (2, 30.0 * (n_cells - half) as f64)].into_iter().collect(),
    };

    let area: Vec<f64> = (0..n_cells).map(|_| rng.gen_range(0.5..5.0)).collect();
    let priority: Vec<f64> = (0..n_cells).map(|_| rng.gen_range(0.0..100.0)).collect();
    let nci: Vec<f64> = (0..n_cells).map(|_| rng.gen_range(0.0..1.0)).collect();
    let savanna: Vec<bool> = (0..n_cells).map(|_| rng.gen_bool(0.3)).collect();
    let licence: Vec<f64> = (0..n_cells).map(|_| rng.gen_range(20.0..100.0)).collect();

    let data = DomainDataBuilder::new(tax, area)
        .static_exclusion(x_mrj)
        .bio_priority(priority)
        .connectivity_nci(nci)
        .savanna_eligible(savanna)
        .water_licence_price(licence)
        .drainage_divisions(regions)
        .ag_transition_costs(tiny_transition_table())
        .water_requirement(w_mrj)
        .ag_habitat_contribution(vec![0.2, 0.7, 1.0, 0.1])
        .build()?;
    Ok((data, base_maps))
}
