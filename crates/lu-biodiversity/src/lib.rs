//! `lu-biodiversity`: biodiversity contribution and target-framework tensors.
//!
//! Every tensor is composed the same way: a raw per-cell value
//! (connectivity-weighted priority × area), times a land-use habitat
//! coefficient, times the late-dry-season fire discount on agricultural land,
//! less the livestock penalty on grazed natural land.  Tensors are never NaN.
//!
//! # Crate layout
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`priority`]      | connectivity weight, `V_r`, fire factor               |
//! | [`contributions`] | `HabitatContributions`, `b_mrj`, non-ag `b_rk`        |
//! | [`overlays`]      | per-management fraction and delta tensors            |
//! | [`gbf2`]          | priority degraded areas mask                          |
//! | [`frameworks`]    | `FrameworkLayers` for GBF2/3/4/8                      |
//! | [`matrices`]      | `biodiversity_matrices`, allocation habitat fractions |
//! | [`error`]         | `BiodiversityError`, `BiodiversityResult`             |

pub mod contributions;
pub mod error;
pub mod frameworks;
pub mod gbf2;
pub mod matrices;
pub mod overlays;
pub mod priority;

#[cfg(test)]
mod tests;

pub use contributions::{HabitatContributions, baseline_b_mrj, cell_value_r, non_ag_b_rk};
pub use error::{BiodiversityError, BiodiversityResult};
pub use frameworks::{FrameworkLayers, GBF2_CATEGORY, framework_layers};
pub use gbf2::priority_degraded_mask;
pub use matrices::{BiodiversityMatrices, biodiversity_matrices};
pub use overlays::{OverlayEffect, OverlayEffects, overlay_effects};
pub use priority::{connectivity_weight, fire_factor_r, raw_value_r};
