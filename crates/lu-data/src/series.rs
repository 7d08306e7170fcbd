//! Time-varying reference inputs.
//!
//! [`YearSeries`] holds an array per anchor year and interpolates between
//! anchors with the same policy as [`lu_core::TargetTimeline`] (linear,
//! holding the end values outside the anchor range).  [`BiocharMultipliers`]
//! is the exception: it is a step series, the latest year at or before the
//! requested one applies.  [`GhgLimitTable`] is an exact lookup with no
//! interpolation at all.

use std::collections::BTreeMap;

use ndarray::{Array, Dimension};
use rustc_hash::FxHashMap;

use lu_core::{AgLandUse, Year, bracket};

use crate::{DataError, DataResult};

// ── YearSeries ────────────────────────────────────────────────────────────────

/// Arrays of one fixed shape keyed by anchor year.
#[derive(Clone, Debug)]
pub struct YearSeries<D: Dimension> {
    anchors: BTreeMap<Year, Array<f64, D>>,
}

impl<D: Dimension> YearSeries<D> {
    /// All anchors must share one shape and hold finite values.
    pub fn new(anchors: BTreeMap<Year, Array<f64, D>>, what: &'static str) -> DataResult<Self> {
        let mut shape: Option<Vec<usize>> = None;
        for (year, a) in &anchors {
            match &shape {
                None => shape = Some(a.shape().to_vec()),
                Some(s) if s.as_slice() != a.shape() => {
                    return Err(DataError::shape(what, s, a.shape()));
                }
                Some(_) => {}
            }
            if let Some((index, &value)) = a.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                tracing::warn!(%year, what, "non-finite value in year series");
                return Err(DataError::InvalidValue { what, index, value });
            }
        }
        Ok(Self { anchors })
    }

    /// A series with a single anchor: the same array for every year.
    pub fn constant(year: Year, values: Array<f64, D>) -> Self {
        let mut anchors = BTreeMap::new();
        anchors.insert(year, values);
        Self { anchors }
    }

    pub fn anchors(&self) -> &BTreeMap<Year, Array<f64, D>> {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Shape shared by every anchor, `None` for an empty series.
    pub fn shape(&self) -> Option<&[usize]> {
        self.anchors.values().next().map(|a| a.shape())
    }

    /// Interpolated array at `year`; `None` only for an empty series.
    pub fn at(&self, year: Year) -> Option<Array<f64, D>> {
        let (lo, hi, w) = bracket(&self.anchors, year)?;
        let a = &self.anchors[&lo];
        if lo == hi {
            return Some(a.clone());
        }
        let b = &self.anchors[&hi];
        Some(a * (1.0 - w) + b * w)
    }
}

// ── BiocharMultipliers ────────────────────────────────────────────────────────

/// Biodiversity multiplier of biochar application per land use per year.
///
/// Land uses with no entry, and years before the first entry, have a
/// multiplier of exactly 1 (no effect).
#[derive(Clone, Debug, Default)]
pub struct BiocharMultipliers {
    by_year: BTreeMap<Year, FxHashMap<AgLandUse, f64>>,
}

impl BiocharMultipliers {
    pub fn new(by_year: BTreeMap<Year, FxHashMap<AgLandUse, f64>>) -> DataResult<Self> {
        for table in by_year.values() {
            if let Some((j, &m)) = table.iter().find(|(_, m)| !m.is_finite() || **m < 0.0) {
                return Err(DataError::InvalidValue { what: "biochar multiplier", index: j.index(), value: m });
            }
        }
        Ok(Self { by_year })
    }

    pub fn insert(&mut self, year: Year, j: AgLandUse, multiplier: f64) {
        self.by_year.entry(year).or_default().insert(j, multiplier);
    }

    /// Multiplier for `j` in `year`: the latest year at or before `year` applies.
    pub fn multiplier(&self, j: AgLandUse, year: Year) -> f64 {
        self.by_year
            .range(..=year)
            .next_back()
            .and_then(|(_, table)| table.get(&j).copied())
            .unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }
}

// ── GhgLimitTable ─────────────────────────────────────────────────────────────

/// External GHG limit scenarios: tCO2e by year, one column per scenario.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GhgLimitTable {
    scenarios: BTreeMap<String, BTreeMap<Year, f64>>,
}

impl GhgLimitTable {
    /// A table holding a single scenario.
    pub fn from_scenario(name: impl Into<String>, limits: BTreeMap<Year, f64>) -> Self {
        let mut table = Self::default();
        table.insert(name, limits);
        table
    }

    /// Add or replace a scenario.
    pub fn insert(&mut self, name: impl Into<String>, limits: BTreeMap<Year, f64>) {
        self.scenarios.insert(name.into(), limits);
    }

    pub fn scenario(&self, name: &str) -> Option<&BTreeMap<Year, f64>> {
        self.scenarios.get(name)
    }

    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }
}
