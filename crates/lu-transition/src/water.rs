//! Water-requirement seam.
//!
//! Transition costing needs `w_mrj`, the water requirement (ML/ha) of every
//! `(m, r, j)` in the year being solved.  Where it comes from is a sibling
//! economic module's business; [`DomainWaterRequirement`] serves the static
//! tensor carried by the reference data.

use ndarray::Array3;

use lu_core::{LandMgmt, Year};
use lu_data::DomainData;

use crate::{TransitionError, TransitionResult};

pub trait WaterRequirementModel {
    /// Water requirement `(m, r, j)` in ML/ha for `year`.
    fn water_requirement_mrj(&self, data: &DomainData, year: Year) -> TransitionResult<Array3<f64>>;
}

/// Year-independent requirement taken from [`DomainData::water_requirement`].
#[derive(Copy, Clone, Debug, Default)]
pub struct DomainWaterRequirement;

impl WaterRequirementModel for DomainWaterRequirement {
    fn water_requirement_mrj(&self, data: &DomainData, _year: Year) -> TransitionResult<Array3<f64>> {
        Ok(data.water_requirement.clone())
    }
}

/// Fetch `w_mrj` from `model` and check its shape against `data`.
pub(crate) fn checked_water_requirement(
    model: &dyn WaterRequirementModel,
    data:  &DomainData,
    year:  Year,
) -> TransitionResult<Array3<f64>> {
    let w = model.water_requirement_mrj(data, year)?;
    let expected = (LandMgmt::COUNT, data.n_cells(), data.n_ag());
    if w.dim() != expected {
        return Err(TransitionError::ShapeMismatch { expected, got: w.dim(), what: "water requirement" });
    }
    Ok(w)
}
