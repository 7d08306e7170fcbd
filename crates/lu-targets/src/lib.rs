//! `lu-targets`: the per-year limits a solve must respect.
//!
//! Limits resolve from settings and reference data by year.  Anchored
//! timelines interpolate linearly between anchors and hold their end values
//! outside them (see [`lu_core::bracket`]).  A disabled limit is empty or
//! `None`, never an error.
//!
//! | Module           | Contents                                            |
//! |------------------|-----------------------------------------------------|
//! | [`biodiversity`] | `FrameworkLimits` for GBF2/3/4/8                    |
//! | [`water`]        | `WaterLimits` per region                            |
//! | [`ghg`]          | `ghg_limit`                                         |
//! | [`limits`]       | `Limits`, `resolve_limits`                          |
//! | [`error`]        | `TargetError`, `TargetResult`                       |

pub mod biodiversity;
pub mod error;
pub mod ghg;
pub mod limits;
pub mod water;

#[cfg(test)]
mod tests;

pub use biodiversity::{FrameworkLimits, biodiversity_limits, framework_limits};
pub use error::{TargetError, TargetResult};
pub use ghg::ghg_limit;
pub use limits::{Limits, resolve_limits};
pub use water::{RegionLimit, WaterLimits, water_limits};
