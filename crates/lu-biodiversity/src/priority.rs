//! The raw spatial biodiversity layer.
//!
//! The priority score of each cell is weighted by connectivity:
//!
//!   weight_r = LB + (1 − LB) · connectivity_r,   LB = 1 − importance
//!
//! so a perfectly connected cell keeps its full score and an isolated one
//! keeps `LB` of it.  With `ConnectivitySource::None` the weight is 1.

use ndarray::Array1;

use lu_core::Settings;
use lu_data::DomainData;

use crate::BiodiversityResult;

/// Connectivity multiplier of every cell.
pub fn connectivity_weight(data: &DomainData, settings: &Settings) -> BiodiversityResult<Array1<f64>> {
    let bio = &settings.biodiversity;
    let lb = bio.connectivity_lb();
    Ok(match data.connectivity(bio.connectivity_source)? {
        Some(conn) => conn.mapv(|c| lb + (1.0 - lb) * c),
        None => Array1::ones(data.n_cells()),
    })
}

/// Connectivity-weighted priority score `V_r`, per hectare.
pub fn raw_value_r(data: &DomainData, settings: &Settings) -> BiodiversityResult<Array1<f64>> {
    Ok(&data.bio_priority * &connectivity_weight(data, settings)?)
}

/// Late-dry-season fire-regime factor: `lds_biodiversity_value` on cells
/// eligible for savanna burning, 1 elsewhere.
pub fn fire_factor_r(data: &DomainData, settings: &Settings) -> Array1<f64> {
    let f = settings.biodiversity.lds_biodiversity_value;
    data.savanna_eligible.mapv(|eligible| if eligible { f } else { 1.0 })
}
