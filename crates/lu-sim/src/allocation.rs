//! Optimizer output and its projection onto land-use maps.

use std::collections::BTreeMap;

use ndarray::{Array2, Array3, s};

use lu_core::{AgLandUse, AgManagement, LandMgmt, LandUse, LandUseMaps, NonAgLandUse};

use crate::{SimError, SimResult};

/// Share of each cell's area allocated to each option.
///
/// | Field         | Shape          |
/// |---------------|----------------|
/// | `ag_mrj`      | `(m, r, j)`    |
/// | `non_ag_rk`   | `(r, k)`       |
/// | `ag_man`      | `(m, r, jj)` per overlay, columns as in `OverlayEffect::land_uses` |
///
/// `ag_mrj` and `non_ag_rk` of each cell sum to 1.  Overlay shares are a
/// subset of the underlying agricultural share and do not count towards it.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub ag_mrj:    Array3<f64>,
    pub non_ag_rk: Array2<f64>,
    pub ag_man:    BTreeMap<AgManagement, Array3<f64>>,
}

const SUM_TOLERANCE: f64 = 1e-6;

impl Allocation {
    /// Every cell stays exactly as in `maps`.
    ///
    /// Fails when `maps` holds a land use outside the given counts.
    pub fn hold(maps: &LandUseMaps, n_ag: usize, n_non_ag: usize) -> SimResult<Self> {
        let n_cells = maps.n_cells();
        let mut ag_mrj = Array3::zeros((LandMgmt::COUNT, n_cells, n_ag));
        let mut non_ag_rk = Array2::zeros((n_cells, n_non_ag));
        for r in 0..n_cells {
            let m = maps.land_mgmt(r).index();
            match maps.land_use(r) {
                LandUse::Ag(j) if j.index() < n_ag => {
                    ag_mrj[[m, r, j.index()]] = 1.0;
                }
                LandUse::NonAg(k) if k.index() < n_non_ag => non_ag_rk[[r, k.index()]] = 1.0,
                lu => {
                    return Err(SimError::Allocation(format!(
                        "cell {r} holds {lu:?}, outside {n_ag} agricultural and {n_non_ag} non-agricultural uses"
                    )));
                }
            }
        }
        Ok(Self { ag_mrj, non_ag_rk, ag_man: BTreeMap::new() })
    }

    pub fn n_cells(&self) -> usize {
        self.ag_mrj.dim().1
    }

    /// Check shapes against the domain and that every cell's shares are
    /// finite, non-negative and sum to 1.
    pub fn validate(&self, n_cells: usize, n_ag: usize, n_non_ag: usize) -> SimResult<()> {
        let expected = (LandMgmt::COUNT, n_cells, n_ag);
        if self.ag_mrj.dim() != expected {
            return Err(SimError::Allocation(format!(
                "ag_mrj has shape {:?}, expected {expected:?}",
                self.ag_mrj.dim()
            )));
        }
        if self.non_ag_rk.dim() != (n_cells, n_non_ag) {
            return Err(SimError::Allocation(format!(
                "non_ag_rk has shape {:?}, expected {:?}",
                self.non_ag_rk.dim(),
                (n_cells, n_non_ag)
            )));
        }
        for (am, x) in &self.ag_man {
            let (m, r, _) = x.dim();
            if (m, r) != (LandMgmt::COUNT, n_cells) {
                return Err(SimError::Allocation(format!("{am} shares have shape {:?}", x.dim())));
            }
        }
        for r in 0..n_cells {
            let ag = self.ag_mrj.slice(s![.., r, ..]);
            let non_ag = self.non_ag_rk.row(r);
            if let Some(bad) = ag.iter().chain(non_ag.iter()).find(|x| !x.is_finite() || **x < 0.0) {
                return Err(SimError::Allocation(format!("cell {r} has share {bad}")));
            }
            let total = ag.sum() + non_ag.sum();
            if (total - 1.0).abs() > SUM_TOLERANCE {
                return Err(SimError::Allocation(format!("cell {r} shares sum to {total}")));
            }
        }
        Ok(())
    }

    /// Dominant option of each cell.  Agricultural options are scanned in
    /// `(m, j)` order, then non-agricultural `k`; the first largest share
    /// wins.  Non-agricultural cells are recorded as dryland.
    pub fn to_maps(&self) -> SimResult<LandUseMaps> {
        let (_, n_cells, n_ag) = self.ag_mrj.dim();
        let mut lumap = Vec::with_capacity(n_cells);
        let mut lmmap = Vec::with_capacity(n_cells);

        for r in 0..n_cells {
            let mut best = (f64::NEG_INFINITY, LandUse::Ag(AgLandUse(0)), LandMgmt::DRYLAND);
            for m in LandMgmt::ALL {
                for j in 0..n_ag {
                    let share = self.ag_mrj[[m.index(), r, j]];
                    if share > best.0 {
                        best = (share, LandUse::Ag(AgLandUse(j as u16)), m);
                    }
                }
            }
            for (k, &share) in self.non_ag_rk.row(r).iter().enumerate() {
                if share > best.0 {
                    best = (share, LandUse::NonAg(NonAgLandUse(k as u16)), LandMgmt::DRYLAND);
                }
            }
            lumap.push(best.1);
            lmmap.push(best.2);
        }
        Ok(LandUseMaps::new(lumap, lmmap)?)
    }
}
