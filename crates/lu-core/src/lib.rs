//! `lu-core`: foundational types for the land-use matrix engine.
//!
//! Every other `lu-*` crate depends on this one.  It has no `lu-*`
//! dependencies and holds nothing that changes within a simulated year.
//!
//! # What lives here
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`ids`]        | `AgLandUse`, `NonAgLandUse`, `LandMgmt`          |
//! | [`landuse`]    | `LandUse`, `AgManagement`, `LandUseTaxonomy`               |
//! | [`years`]      | `Year`                                                     |
//! | [`timeline`]   | `TargetTimeline`, `bracket` (interpolation policy)         |
//! | [`settings`]   | `Settings` and its sections, TOML loading, validation      |
//! | [`history`]    | `LandUseMaps`, `LandUseHistory` (append-only)              |
//! | [`error`]      | `CoreError`, `CoreResult`                                  |
//!
//! # Axis conventions
//!
//! | Suffix | Axes                                    |
//! |--------|-----------------------------------------|
//! | `_mrj` | land management × cell × ag land use    |
//! | `_rk`  | cell × non-ag land use                  |
//! | `_rj`  | cell × ag land use                      |
//! | `_r`   | cell                                    |

pub mod error;
pub mod history;
pub mod ids;
pub mod landuse;
pub mod settings;
pub mod timeline;
pub mod years;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use history::{LandUseHistory, LandUseMaps};
pub use ids::{AgLandUse, LandMgmt, NonAgLandUse};
pub use landuse::{
    AgManagement, LandUse, LandUseTaxonomy, NON_AGRICULTURAL_LU_BASE_CODE,
    STANDARD_AG_LAND_USES, STANDARD_NON_AG_LAND_USES, UNALLOCATED_NATURAL_LAND,
};
pub use settings::{
    AgManagementSettings, BiodiversityFramework, BiodiversitySettings, ConnectivitySource,
    EconomicSettings, Gbf2Settings, GhgLimitsType, GhgSettings, HCAS_PERCENTILES, HabitatCondition,
    NonAgContributions, Settings, WaterRegionDef, WaterSettings,
};
pub use timeline::{TargetTimeline, bracket};
pub use years::Year;
