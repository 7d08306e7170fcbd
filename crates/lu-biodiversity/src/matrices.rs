//! One year's complete set of biodiversity tensors.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};

use lu_core::{AgManagement, BiodiversityFramework, LandMgmt, LandUseHistory, Settings, Year};
use lu_data::DomainData;

use crate::contributions::{HabitatContributions, baseline_b_mrj, cell_value_r, non_ag_b_rk};
use crate::frameworks::{FrameworkLayers, framework_layers};
use crate::overlays::{OverlayEffects, overlay_effects};
use crate::{BiodiversityError, BiodiversityResult};

#[derive(Clone, Debug)]
pub struct BiodiversityMatrices {
    pub year:          Year,
    pub contributions: HabitatContributions,
    /// `V_r · area_r`.
    pub value_r:       Array1<f64>,
    pub b_mrj:         Array3<f64>,
    pub non_ag_b_rk:   Array2<f64>,
    pub overlays:      OverlayEffects,
    /// One entry per framework in [`BiodiversityFramework::ALL`] order;
    /// disabled frameworks are empty.
    pub frameworks:    Vec<FrameworkLayers>,
}

impl BiodiversityMatrices {
    pub fn framework(&self, fw: BiodiversityFramework) -> Option<&FrameworkLayers> {
        self.frameworks.iter().find(|l| l.framework == fw)
    }

    /// Habitat fraction of every cell under an allocation.
    ///
    /// Each cell sums its shares times the habitat fraction of the
    /// allocated option, plus each overlay share times that overlay's
    /// fraction change.  `ag_man` columns follow
    /// [`OverlayEffect::land_uses`](crate::OverlayEffect::land_uses).
    pub fn allocated_fraction_r(
        &self,
        ag_mrj:    &Array3<f64>,
        non_ag_rk: &Array2<f64>,
        ag_man:    &BTreeMap<AgManagement, Array3<f64>>,
    ) -> BiodiversityResult<Array1<f64>> {
        let c = &self.contributions;
        let n_cells = self.value_r.len();
        check_shape("ag_mrj", ag_mrj.shape(), &[LandMgmt::COUNT, n_cells, c.ag_j.len()])?;
        check_shape("non_ag_rk", non_ag_rk.shape(), &[n_cells, c.non_ag_k.len()])?;

        let mut fraction_r = non_ag_rk.dot(&c.non_ag_k);
        add_weighted(&mut fraction_r, ag_mrj, c.ag_fraction_rj().view());

        for (&am, x_mrj) in ag_man {
            let Some(effect) = self.overlays.get(am) else { continue };
            let expected = [LandMgmt::COUNT, n_cells, effect.land_uses.len()];
            check_shape(&format!("{} shares", am.name()), x_mrj.shape(), &expected)?;
            add_weighted(&mut fraction_r, x_mrj, effect.fraction_rj.view());
        }
        Ok(fraction_r)
    }
}

/// `acc[r] += Σ_m Σ_j x[m, r, j] · f[r, j]`.
fn add_weighted(acc: &mut Array1<f64>, x_mrj: &Array3<f64>, f_rj: ArrayView2<'_, f64>) {
    for x_rj in x_mrj.outer_iter() {
        *acc += &(&x_rj * &f_rj).sum_axis(Axis(1));
    }
}

fn check_shape(what: &str, got: &[usize], expected: &[usize]) -> BiodiversityResult<()> {
    if got == expected {
        Ok(())
    } else {
        Err(BiodiversityError::ShapeMismatch {
            what:     what.to_owned(),
            expected: expected.to_vec(),
            got:      got.to_vec(),
        })
    }
}

/// Build every biodiversity tensor for `year`.  GBF2 cells are selected
/// from the history's base-year map.
pub fn biodiversity_matrices(
    data:     &DomainData,
    settings: &Settings,
    history:  &LandUseHistory,
    year:     Year,
) -> BiodiversityResult<BiodiversityMatrices> {
    let contributions = HabitatContributions::new(data, settings)?;
    let value_r = cell_value_r(data, settings)?;
    let (_, base_maps) = history.base();

    let b_mrj = baseline_b_mrj(data, &contributions, &value_r);
    let non_ag_b_rk = non_ag_b_rk(&contributions, &value_r);
    let overlays = overlay_effects(data, settings, &contributions, &value_r, year);
    let frameworks = BiodiversityFramework::ALL
        .iter()
        .map(|&fw| framework_layers(data, settings, &contributions, &value_r, base_maps, fw, year))
        .collect::<BiodiversityResult<Vec<_>>>()?;

    tracing::debug!(
        %year,
        frameworks = frameworks.iter().filter(|f| !f.is_empty()).count(),
        "biodiversity matrices built"
    );
    Ok(BiodiversityMatrices { year, contributions, value_r, b_mrj, non_ag_b_rk, overlays, frameworks })
}
