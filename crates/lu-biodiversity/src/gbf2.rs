//! Priority degraded areas.
//!
//! A cell is *degraded* when it was agricultural in the base year and its
//! habitat fraction there (`max(0, c_j · fire_r − p_j)`) is below 1.
//! Degraded cells are ranked by connectivity-weighted priority, highest
//! first (ties by cell index), and taken while the area already selected is
//! below `cut`% of the total degraded area.

use ndarray::Array1;

use lu_core::LandUseMaps;
use lu_data::DomainData;

use crate::contributions::HabitatContributions;
use crate::{BiodiversityError, BiodiversityResult};

/// Cells restored under the GBF2 target.
pub fn priority_degraded_mask(
    data:          &DomainData,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
    base_maps:     &LandUseMaps,
    cut:           f64,
) -> BiodiversityResult<Array1<bool>> {
    let n_cells = data.n_cells();
    if base_maps.n_cells() != n_cells {
        return Err(BiodiversityError::CellCountMismatch {
            expected: n_cells,
            got:      base_maps.n_cells(),
            what:     "base-year lumap",
        });
    }

    let mut degraded: Vec<usize> = (0..n_cells)
        .filter(|&r| {
            let lu = base_maps.land_use(r);
            lu.is_agricultural() && contributions.fraction(r, lu) < 1.0
        })
        .collect();

    // Ranked by per-hectare priority.
    let priority = |r: usize| {
        let area = data.real_area[r];
        if area > 0.0 { value_r[r] / area } else { 0.0 }
    };
    degraded.sort_by(|&a, &b| priority(b).total_cmp(&priority(a)).then(a.cmp(&b)));

    let total: f64 = degraded.iter().map(|&r| data.real_area[r]).sum();
    let threshold = cut / 100.0 * total;

    let mut mask = Array1::from_elem(n_cells, false);
    let mut selected = 0.0;
    for r in degraded {
        if selected >= threshold {
            break;
        }
        mask[r] = true;
        selected += data.real_area[r];
    }

    tracing::debug!(
        cut,
        degraded_area = total,
        selected_area = selected,
        cells = mask.iter().filter(|&&b| b).count(),
        "priority degraded areas selected"
    );
    Ok(mask)
}
