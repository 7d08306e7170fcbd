//! Agricultural-management overlay effects.
//!
//! Each overlay changes the habitat fraction of the cells it is applied to.
//! `fraction_rj` holds that change per unit share, with `jj` indexing the
//! overlay's eligible land uses present in the taxonomy, and
//! `delta_mrj = V · area · fraction_rj` is the matching change to `b_mrj`
//! (the same for both `m`).
//!
//! | Overlay         | Fraction change                                   |
//! |-----------------|---------------------------------------------------|
//! | Savanna Burning | `1 − f` on eligible cells, else 0                 |
//! | Biochar         | `frac(r, j) · (mult(j, yr) − 1)`                  |
//! | Beef/Sheep HIR  | `fire · c_unalloc · (1 − penalty) − frac(r, j)`   |
//! | others          | 0                                                 |
//!
//! `frac(r, j)` is [`HabitatContributions::ag_fraction`].  A disabled
//! overlay yields zero tensors of the same shape.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3, Axis, s};

use lu_core::{AgLandUse, AgManagement, LandMgmt, Settings, Year};
use lu_data::DomainData;

use crate::contributions::HabitatContributions;

/// Delta tensor of one overlay.
#[derive(Clone, Debug)]
pub struct OverlayEffect {
    pub management:  AgManagement,
    pub enabled:     bool,
    /// Column `jj` of `fraction_rj` and `delta_mrj` belongs to `land_uses[jj]`.
    pub land_uses:   Vec<AgLandUse>,
    /// Habitat-fraction change per unit share, `(r, jj)`.
    pub fraction_rj: Array2<f64>,
    pub delta_mrj:   Array3<f64>,
}

impl OverlayEffect {
    /// Delta for `(m, r, j)`; 0 when `j` is not eligible.
    pub fn delta(&self, m: LandMgmt, r: usize, j: AgLandUse) -> f64 {
        self.land_uses
            .iter()
            .position(|&lu| lu == j)
            .map_or(0.0, |jj| self.delta_mrj[[m.index(), r, jj]])
    }
}

/// Every overlay's effect, keyed by overlay.
#[derive(Clone, Debug)]
pub struct OverlayEffects {
    effects: BTreeMap<AgManagement, OverlayEffect>,
}

impl OverlayEffects {
    pub fn get(&self, am: AgManagement) -> Option<&OverlayEffect> {
        self.effects.get(&am)
    }

    /// Effects in [`AgManagement::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayEffect> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Build the delta tensors of every overlay for `year`.
pub fn overlay_effects(
    data:          &DomainData,
    settings:      &Settings,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
    year:          Year,
) -> OverlayEffects {
    let effects = AgManagement::ALL
        .iter()
        .map(|&am| (am, overlay_effect(data, settings, contributions, value_r, year, am)))
        .collect();
    OverlayEffects { effects }
}

fn overlay_effect(
    data:          &DomainData,
    settings:      &Settings,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
    year:          Year,
    am:            AgManagement,
) -> OverlayEffect {
    let land_uses = data.taxonomy.overlay_land_uses(am);
    let enabled = settings.ag_managements.is_enabled(am);
    let mut fraction_rj = Array2::zeros((data.n_cells(), land_uses.len()));

    if enabled {
        for (jj, &j) in land_uses.iter().enumerate() {
            if let Some(fraction_r) = fraction_change_r(data, settings, contributions, year, am, j) {
                fraction_rj.column_mut(jj).assign(&fraction_r);
            }
        }
    }

    let delta_rj = &fraction_rj * &value_r.view().insert_axis(Axis(1));
    let mut delta_mrj = Array3::zeros((LandMgmt::COUNT, data.n_cells(), land_uses.len()));
    for m in 0..LandMgmt::COUNT {
        delta_mrj.slice_mut(s![m, .., ..]).assign(&delta_rj);
    }

    tracing::trace!(overlay = am.name(), enabled, land_uses = land_uses.len(), "overlay effect built");
    OverlayEffect { management: am, enabled, land_uses, fraction_rj, delta_mrj }
}

/// Per-cell habitat-fraction change of applying `am` to land use `j`;
/// `None` for a zero column.
fn fraction_change_r(
    data:          &DomainData,
    settings:      &Settings,
    contributions: &HabitatContributions,
    year:          Year,
    am:            AgManagement,
    j:             AgLandUse,
) -> Option<Array1<f64>> {
    let c = contributions;
    let frac_r = || Array1::from_shape_fn(c.fire_r.len(), |r| c.ag_fraction(r, j));

    match am {
        AgManagement::SavannaBurning => {
            let f = settings.biodiversity.lds_biodiversity_value;
            Some(data.savanna_eligible.mapv(|e| if e { 1.0 - f } else { 0.0 }))
        }
        AgManagement::Biochar => {
            let mult = data.biochar.multiplier(j, year);
            if mult == 1.0 {
                return None;
            }
            Some(frac_r() * (mult - 1.0))
        }
        AgManagement::BeefHir | AgManagement::SheepHir => {
            let penalty = settings.ag_managements.hir_biodiversity_penalty;
            let c_unalloc = c.ag_j[c.unallocated.index()];
            Some(c.fire_r.mapv(|fire| fire * c_unalloc * (1.0 - penalty)) - frac_r())
        }
        AgManagement::Asparagopsis
        | AgManagement::PrecisionAgriculture
        | AgManagement::EcologicalGrazing
        | AgManagement::AgTechEi => None,
    }
}
