//! Habitat contributions and the baseline biodiversity tensors.
//!
//! | Tensor      | Formula                                   |
//! |-------------|-------------------------------------------|
//! | `b_mrj`     | `V_r · area_r · max(0, fire_r · c_j − p_j)` (same for both `m`) |
//! | `non_ag_b_rk` | `V_r · area_r · c_k`                     |
//!
//! `c_j` is the share of a cell's value an agricultural land use retains,
//! taken from the source `biodiversity.habitat_condition` selects:
//!
//! | Source         | `c_j`                                          |
//! |----------------|------------------------------------------------|
//! | `HCAS`         | domain HCAS layer at `hcas_percentile`         |
//! | `USER_DEFINED` | `habitat_condition_user_defined[name]`         |
//! | `NONE`         | 1                                              |
//!
//! `p_j` is `livestock_impact` for livestock on natural land and 0
//! otherwise.  `c_k` comes from settings by non-agricultural land-use name;
//! destocked natural land takes the unallocated-natural-land share.  The
//! fire discount only applies to agricultural land.

use ndarray::{Array1, Array2, Array3, Axis};

use lu_core::{
    AgLandUse, BiodiversitySettings, HabitatCondition, LandMgmt, LandUse, LandUseMaps, Settings,
};
use lu_data::DomainData;

use crate::priority::{fire_factor_r, raw_value_r};
use crate::{BiodiversityError, BiodiversityResult};

/// Per-land-use habitat shares and the per-cell fire factor.
#[derive(Clone, Debug)]
pub struct HabitatContributions {
    /// `c_j`, indexed by agricultural land use.
    pub ag_j:        Array1<f64>,
    /// `p_j`: share of the raw value lost to livestock on natural land.
    pub penalty_j:   Array1<f64>,
    /// `c_k`, indexed by non-agricultural land use.
    pub non_ag_k:    Array1<f64>,
    /// Fire-regime factor per cell.
    pub fire_r:      Array1<f64>,
    pub unallocated: AgLandUse,
}

impl HabitatContributions {
    pub fn new(data: &DomainData, settings: &Settings) -> BiodiversityResult<Self> {
        let tax = &data.taxonomy;
        let bio = &settings.biodiversity;
        let unallocated = tax.unallocated_natural()?;
        let ag_j = habitat_condition_j(data, bio)?;
        let c_unallocated = ag_j[unallocated.index()];
        let table = &bio.non_ag_contributions;

        let natural = tax.natural_land_uses();
        let livestock = tax.livestock_land_uses();
        let penalty_j = tax
            .ag_ids()
            .map(|j| if natural.contains(&j) && livestock.contains(&j) { bio.livestock_impact } else { 0.0 })
            .collect();

        let non_ag_k = tax
            .non_ag_ids()
            .map(|k| {
                let name = tax.non_ag_name(k);
                if name.starts_with("Destocked") {
                    return c_unallocated;
                }
                table.by_name(name).unwrap_or_else(|| {
                    tracing::warn!(land_use = name, "no habitat contribution configured; using 0");
                    0.0
                })
            })
            .collect();

        Ok(Self { ag_j, penalty_j, non_ag_k, fire_r: fire_factor_r(data, settings), unallocated })
    }

    /// Habitat fraction of cell `r` under agricultural land use `j`.
    #[inline]
    pub fn ag_fraction(&self, r: usize, j: AgLandUse) -> f64 {
        let j = j.index();
        (self.ag_j[j] * self.fire_r[r] - self.penalty_j[j]).max(0.0)
    }

    /// Habitat fraction of cell `r` under `lu`.
    #[inline]
    pub fn fraction(&self, r: usize, lu: LandUse) -> f64 {
        match lu {
            LandUse::Ag(j) => self.ag_fraction(r, j),
            LandUse::NonAg(k) => self.non_ag_k[k.index()],
        }
    }

    /// [`ag_fraction`](Self::ag_fraction) of every `(r, j)`.
    pub fn ag_fraction_rj(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.fire_r.len(), self.ag_j.len()), |(r, j)| {
            self.ag_fraction(r, AgLandUse(j as u16))
        })
    }

    /// Habitat fraction of every cell under the land uses of `maps`.
    pub fn fractions_for(&self, maps: &LandUseMaps) -> BiodiversityResult<Array1<f64>> {
        if maps.n_cells() != self.fire_r.len() {
            return Err(BiodiversityError::CellCountMismatch {
                expected: self.fire_r.len(),
                got:      maps.n_cells(),
                what:     "lumap",
            });
        }
        Ok(maps.lumap().iter().enumerate().map(|(r, &lu)| self.fraction(r, lu)).collect())
    }
}

fn habitat_condition_j(data: &DomainData, bio: &BiodiversitySettings) -> BiodiversityResult<Array1<f64>> {
    let tax = &data.taxonomy;
    match bio.habitat_condition {
        HabitatCondition::Hcas => Ok(data.hcas_contribution(bio.hcas_percentile)?.clone()),
        HabitatCondition::UserDefined => tax
            .ag_ids()
            .map(|j| {
                let name = tax.ag_name(j);
                bio.habitat_condition_user_defined
                    .get(name)
                    .copied()
                    .ok_or_else(|| BiodiversityError::MissingContribution(name.to_owned()))
            })
            .collect(),
        HabitatCondition::None => Ok(Array1::ones(data.n_ag())),
    }
}

/// Value of each cell at full habitat: `V_r · area_r`.
pub fn cell_value_r(data: &DomainData, settings: &Settings) -> BiodiversityResult<Array1<f64>> {
    Ok(raw_value_r(data, settings)? * &data.real_area)
}

/// Agricultural baseline `b_mrj`.
pub fn baseline_b_mrj(
    data:          &DomainData,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
) -> Array3<f64> {
    let b_rj = contributions.ag_fraction_rj() * &value_r.view().insert_axis(Axis(1));
    let mut b_mrj = Array3::zeros((LandMgmt::COUNT, data.n_cells(), data.n_ag()));
    for mut b_rj_m in b_mrj.outer_iter_mut() {
        b_rj_m.assign(&b_rj);
    }
    b_mrj
}

/// Non-agricultural baseline `b_rk`.
pub fn non_ag_b_rk(contributions: &HabitatContributions, value_r: &Array1<f64>) -> Array2<f64> {
    value_r
        .view()
        .insert_axis(Axis(1))
        .dot(&contributions.non_ag_k.view().insert_axis(Axis(0)))
}
