//! The immutable reference data of one run.
//!
//! `DomainData` is a structure of arrays: every per-cell quantity is its own
//! array indexed by `r`.  It is built and validated once by
//! [`DomainDataBuilder`](crate::DomainDataBuilder) and then only read.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3};

use lu_core::{BiodiversityFramework, ConnectivitySource, LandUseTaxonomy, WaterRegionDef};

use crate::{BiocharMultipliers, DataError, DataResult, GhgLimitTable, ScoreFrameworkData};

// ── WaterRegions ──────────────────────────────────────────────────────────────

/// One regionalisation of the cells for water accounting.
#[derive(Clone, Debug)]
pub struct WaterRegions {
    /// Region id of each cell.
    pub region_r:         Vec<u16>,
    pub names:            BTreeMap<u16, String>,
    /// Historical (pre-development) water yield of each region, ML.
    pub historical_yield: BTreeMap<u16, f64>,
}

impl WaterRegions {
    /// Cells belonging to `region`, ascending.
    pub fn cells(&self, region: u16) -> Vec<usize> {
        self.region_r
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id == region)
            .map(|(r, _)| r)
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.names.keys().copied()
    }
}

// ── DomainData ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct DomainData {
    pub taxonomy: LandUseTaxonomy,

    // ── Per cell ──────────────────────────────────────────────────────────
    /// Cell area, ha.
    pub real_area:           Array1<f64>,
    /// Base-year legal `(m, r, j)` combinations.
    pub static_exclusion:    Array3<bool>,
    /// Raw biodiversity priority score, before connectivity weighting.
    pub bio_priority:        Array1<f64>,
    /// National Connectivity Index, normalised to `[0, 1]`.
    pub connectivity_nci:    Option<Array1<f64>>,
    /// Distance-to-natural-land connectivity, normalised to `[0, 1]`.
    pub connectivity_dwi:    Option<Array1<f64>>,
    pub savanna_eligible:    Array1<bool>,
    /// Water licence price of the cell's region, $/ML.
    pub water_licence_price: Array1<f64>,
    pub drainage_divisions:  Option<WaterRegions>,
    pub river_regions:       Option<WaterRegions>,

    // ── Per land use ──────────────────────────────────────────────────────
    /// Raw establishment cost `t_ij`, $/ha, lexicographic `(from, to)`.
    /// NaN marks a transition that is not allowed.
    pub ag_transition_costs:     Array2<f64>,
    /// Water requirement `(m, r, j)`, ML/ha.
    pub water_requirement:       Array3<f64>,
    /// HCAS habitat condition by percentile: the share of the raw
    /// biodiversity value each agricultural land use retains.
    pub hcas:                    BTreeMap<u8, Array1<f64>>,
    pub biochar:                 BiocharMultipliers,

    // ── Targets ───────────────────────────────────────────────────────────
    /// Score-based frameworks.  GBF2 is derived from `bio_priority` and never
    /// appears here.
    pub frameworks:      BTreeMap<BiodiversityFramework, ScoreFrameworkData>,
    /// External GHG limit scenarios, for `limits_type = "file"`.
    pub ghg_limit_table: Option<GhgLimitTable>,
}

impl DomainData {
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.real_area.len()
    }

    #[inline]
    pub fn n_ag(&self) -> usize {
        self.taxonomy.n_ag()
    }

    #[inline]
    pub fn n_non_ag(&self) -> usize {
        self.taxonomy.n_non_ag()
    }

    pub fn framework(&self, framework: BiodiversityFramework) -> Option<&ScoreFrameworkData> {
        self.frameworks.get(&framework)
    }

    /// The connectivity layer for `source`; `Ok(None)` for
    /// [`ConnectivitySource::None`].  Selecting a source that was not loaded
    /// is an error.
    pub fn connectivity(&self, source: ConnectivitySource) -> DataResult<Option<&Array1<f64>>> {
        let layer = match source {
            ConnectivitySource::None => return Ok(None),
            ConnectivitySource::Nci => self.connectivity_nci.as_ref(),
            ConnectivitySource::Dwi => self.connectivity_dwi.as_ref(),
        };
        layer
            .map(Some)
            .ok_or_else(|| DataError::MissingLayer(format!("connectivity {source:?}")))
    }

    /// HCAS contribution `c_j` at `percentile`.  Selecting a percentile that
    /// was not loaded is an error.
    pub fn hcas_contribution(&self, percentile: u8) -> DataResult<&Array1<f64>> {
        self.hcas
            .get(&percentile)
            .ok_or_else(|| DataError::MissingLayer(format!("HCAS percentile {percentile}")))
    }

    /// The regionalisation selected by `def`.  Selecting one that was not
    /// loaded is an error.
    pub fn water_regions(&self, def: WaterRegionDef) -> DataResult<&WaterRegions> {
        let regions = match def {
            WaterRegionDef::DrainageDivision => self.drainage_divisions.as_ref(),
            WaterRegionDef::RiverRegion => self.river_regions.as_ref(),
        };
        regions.ok_or_else(|| DataError::MissingLayer(format!("water regions {def:?}")))
    }
}
