//! `lu-data`: immutable domain reference data for the land-use matrix engine.
//!
//! Reference data is loaded once per run and is read-only afterwards.  The
//! engines in `lu-transition`, `lu-biodiversity` and `lu-targets` take it as
//! `&DomainData`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`domain`]    | `DomainData` (SoA per-cell arrays), `WaterRegions`         |
//! | [`builder`]   | `DomainDataBuilder` (defaults + shape/range validation)    |
//! | [`series`]    | `YearSeries` (interpolated arrays), `BiocharMultipliers`   |
//! | [`framework`] | `ScoreFrameworkData` (GBF3/4/8 inputs)                     |
//! | [`loader`]    | CSV loaders, `CellTable`                                   |
//! | [`error`]     | `DataError`, `DataResult`                                  |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `fixtures` | Exposes [`fixtures`], a four-cell domain for tests/demos.  |

pub mod builder;
pub mod domain;
pub mod error;
pub mod framework;
pub mod loader;
pub mod series;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;


pub use builder::DomainDataBuilder;
pub use domain::{DomainData, WaterRegions};
pub use error::{DataError, DataResult};
pub use framework::ScoreFrameworkData;
pub use loader::{
    CellTable, load_biochar_csv, load_biochar_reader, load_category_baselines_csv,
    load_category_baselines_reader, load_category_layers_csv, load_category_layers_reader,
    load_category_targets_csv, load_category_targets_reader, load_cell_table_csv,
    load_cell_table_reader, load_ghg_limits_csv, load_ghg_limits_reader,
    load_habitat_contribution_csv, load_habitat_contribution_reader, load_hcas_csv,
    load_hcas_reader, load_score_framework_csv, load_transition_table_csv,
    load_transition_table_reader, load_water_regions_csv, load_water_regions_reader,
};
pub use series::{BiocharMultipliers, GhgLimitTable, YearSeries};
