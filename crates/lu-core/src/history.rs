//! Land-use maps and their append-only history.
//!
//! The history is the only state carried from one simulated year to the
//! next.  The year loop is its single writer: it appends exactly one
//! [`LandUseMaps`] per solved year, in strictly increasing year order.
//! Everything else reads it.

use std::collections::BTreeMap;

use ndarray::Array3;

use crate::{AgLandUse, CoreError, CoreResult, LandMgmt, LandUse, LandUseTaxonomy, Year};

// ── LandUseMaps ───────────────────────────────────────────────────────────────

/// The land use (`lumap`) and land management (`lmmap`) of every cell in one
/// year.
#[derive(Clone, Debug, PartialEq)]
pub struct LandUseMaps {
    lumap: Vec<LandUse>,
    lmmap: Vec<LandMgmt>,
}

impl LandUseMaps {
    pub fn new(lumap: Vec<LandUse>, lmmap: Vec<LandMgmt>) -> CoreResult<Self> {
        if lumap.len() != lmmap.len() {
            return Err(CoreError::CellCountMismatch {
                expected: lumap.len(),
                got:      lmmap.len(),
                what:     "lmmap",
            });
        }
        if let Some(bad) = lmmap.iter().find(|m| m.index() >= LandMgmt::COUNT) {
            return Err(CoreError::Settings(format!("invalid land-management code {}", bad.0)));
        }
        Ok(Self { lumap, lmmap })
    }

    /// Decode raw map codes (`j`, or `k + 100`) and management codes
    /// (0 = dryland, 1 = irrigated).
    pub fn from_codes(lu_codes: &[u16], lm_codes: &[u8], taxonomy: &LandUseTaxonomy) -> CoreResult<Self> {
        let lumap = lu_codes
            .iter()
            .map(|&c| taxonomy.decode(c))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(lumap, lm_codes.iter().map(|&m| LandMgmt(m)).collect())
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.lumap.len()
    }

    #[inline]
    pub fn land_use(&self, r: usize) -> LandUse {
        self.lumap[r]
    }

    #[inline]
    pub fn land_mgmt(&self, r: usize) -> LandMgmt {
        self.lmmap[r]
    }

    pub fn lumap(&self) -> &[LandUse] {
        &self.lumap
    }

    pub fn lmmap(&self) -> &[LandMgmt] {
        &self.lmmap
    }

    /// Current `(m, j)` of an agricultural cell; `None` on non-agricultural land.
    #[inline]
    pub fn current_ag(&self, r: usize) -> Option<(LandMgmt, AgLandUse)> {
        self.lumap[r].ag().map(|j| (self.lmmap[r], j))
    }

    #[inline]
    pub fn is_agricultural(&self, r: usize) -> bool {
        self.lumap[r].is_agricultural()
    }

    /// Indices of agricultural cells, ascending.
    pub fn ag_cells(&self) -> Vec<usize> {
        (0..self.n_cells()).filter(|&r| self.is_agricultural(r)).collect()
    }

    /// Indices of non-agricultural cells, ascending.
    pub fn non_ag_cells(&self) -> Vec<usize> {
        (0..self.n_cells()).filter(|&r| !self.is_agricultural(r)).collect()
    }

    /// One-hot `(m, r, j)` indicator of each agricultural cell's current state.
    /// Non-agricultural cells are all `false`.
    pub fn l_mrj(&self, n_ag: usize) -> Array3<bool> {
        let mut l = Array3::from_elem((LandMgmt::COUNT, self.n_cells(), n_ag), false);
        for r in 0..self.n_cells() {
            if let Some((m, j)) = self.current_ag(r) {
                l[[m.index(), r, j.index()]] = true;
            }
        }
        l
    }

    /// Raw map codes, as written to disk.
    pub fn lu_codes(&self) -> Vec<u16> {
        self.lumap.iter().map(|lu| lu.code()).collect()
    }
}

// ── LandUseHistory ────────────────────────────────────────────────────────────

/// Append-only log of land-use maps keyed by calendar year.
#[derive(Clone, Debug)]
pub struct LandUseHistory {
    maps: BTreeMap<Year, LandUseMaps>,
}

impl LandUseHistory {
    /// Start a history with the observed base-year maps.
    pub fn new(base_year: Year, base: LandUseMaps) -> Self {
        let mut maps = BTreeMap::new();
        maps.insert(base_year, base);
        Self { maps }
    }

    /// Append the maps of a newly solved year.
    ///
    /// `year` must be strictly after the latest recorded year and the maps
    /// must cover the same cells as the base year.
    pub fn push(&mut self, year: Year, maps: LandUseMaps) -> CoreResult<()> {
        let (last, base) = self.latest();
        let expected = base.n_cells();
        if year <= last {
            return Err(CoreError::HistoryOrder { last, got: year });
        }
        if maps.n_cells() != expected {
            return Err(CoreError::CellCountMismatch { expected, got: maps.n_cells(), what: "lumap" });
        }
        self.maps.insert(year, maps);
        Ok(())
    }

    /// Maps recorded for `year`.
    pub fn get(&self, year: Year) -> CoreResult<&LandUseMaps> {
        self.maps.get(&year).ok_or(CoreError::MissingYear(year))
    }

    /// The observed base-year maps (first entry).
    pub fn base(&self) -> (Year, &LandUseMaps) {
        match self.maps.iter().next() {
            Some((&y, m)) => (y, m),
            None => unreachable!("history always holds the base year"),
        }
    }

    /// The most recently appended maps.
    pub fn latest(&self) -> (Year, &LandUseMaps) {
        match self.maps.iter().next_back() {
            Some((&y, m)) => (y, m),
            None => unreachable!("history always holds the base year"),
        }
    }

    pub fn contains(&self, year: Year) -> bool {
        self.maps.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.maps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.base().1.n_cells()
    }
}
