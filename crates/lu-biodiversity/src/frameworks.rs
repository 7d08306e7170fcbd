//! Target-framework layers.
//!
//! Every framework reduces to a `(v, r)` matrix of per-cell values: the
//! score category `v` gains from cell `r` at full habitat.  Multiplying by
//! a land-use map's habitat fractions and summing over cells gives the
//! in-study-area score of each category.
//!
//! | Framework      | Categories                    | `layer_vr`                        |
//! |----------------|-------------------------------|-----------------------------------|
//! | GBF2           | one ("Priority degraded areas") | `V_r · area_r` on masked cells  |
//! | GBF3, GBF4, GBF8 | from reference data          | `layer[v, r](year) · area_r`      |
//!
//! A disabled framework yields no categories: `names` is empty and
//! `layer_vr` has shape `(0, n_cells)`.

use ndarray::{Array1, Array2, Axis};

use lu_core::{BiodiversityFramework, LandUseMaps, Settings, Year};
use lu_data::DomainData;

use crate::contributions::HabitatContributions;
use crate::{BiodiversityError, BiodiversityResult};

pub const GBF2_CATEGORY: &str = "Priority degraded areas";

#[derive(Clone, Debug)]
pub struct FrameworkLayers {
    pub framework: BiodiversityFramework,
    pub names:     Vec<String>,
    pub layer_vr:  Array2<f64>,
}

impl FrameworkLayers {
    pub fn empty(framework: BiodiversityFramework, n_cells: usize) -> Self {
        Self { framework, names: Vec::new(), layer_vr: Array2::zeros((0, n_cells)) }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn n_categories(&self) -> usize {
        self.names.len()
    }

    /// Score of each category with every cell at full habitat.
    pub fn max_scores(&self) -> Array1<f64> {
        self.layer_vr.sum_axis(Axis(1))
    }

    /// Score of each category given per-cell habitat fractions.
    pub fn scores(&self, fraction_r: &Array1<f64>) -> Array1<f64> {
        self.layer_vr.dot(fraction_r)
    }

    /// Score of each category under the land uses of `maps`.
    pub fn scores_for(
        &self,
        contributions: &HabitatContributions,
        maps:          &LandUseMaps,
    ) -> BiodiversityResult<Array1<f64>> {
        Ok(self.scores(&contributions.fractions_for(maps)?))
    }
}

/// Layers of `framework` for `year`.
///
/// `base_maps` is the base-year land-use map; GBF2 selects its cells from
/// it.  `value_r` is [`crate::cell_value_r`].
pub fn framework_layers(
    data:          &DomainData,
    settings:      &Settings,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
    base_maps:     &LandUseMaps,
    framework:     BiodiversityFramework,
    year:          Year,
) -> BiodiversityResult<FrameworkLayers> {
    let n_cells = data.n_cells();
    if !settings.biodiversity.is_enabled(framework) {
        return Ok(FrameworkLayers::empty(framework, n_cells));
    }

    if framework == BiodiversityFramework::Gbf2 {
        let mask = crate::gbf2::priority_degraded_mask(
            data,
            contributions,
            value_r,
            base_maps,
            settings.biodiversity.gbf2.priority_degraded_areas_percentage_cut,
        )?;
        let layer_r: Array1<f64> =
            value_r.iter().zip(&mask).map(|(&v, &on)| if on { v } else { 0.0 }).collect();
        return Ok(FrameworkLayers {
            framework,
            names: vec![GBF2_CATEGORY.to_owned()],
            layer_vr: layer_r.insert_axis(Axis(0)),
        });
    }

    let fw = data
        .framework(framework)
        .ok_or(BiodiversityError::MissingFramework(framework.name()))?;
    let Some(layers) = fw.layers.at(year) else {
        return Err(BiodiversityError::MissingFramework(framework.name()));
    };
    let layer_vr = layers * &data.real_area;

    tracing::debug!(framework = framework.name(), %year, categories = fw.n_categories(), "framework layers built");
    Ok(FrameworkLayers { framework, names: fw.names.clone(), layer_vr })
}
