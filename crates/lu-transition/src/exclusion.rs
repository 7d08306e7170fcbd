//! Exclusion matrices `x_mrj`.
//!
//! A cell may move to `(m, j)` when the base-year static mask allows it and
//! the raw transition table defines a cost from the cell's reference land use
//! to `j`.  The reference land use is:
//!
//! | Cell today        | Row of the transition table used        |
//! |-------------------|-----------------------------------------|
//! | agricultural `i`  | `i`                                     |
//! | non-agricultural  | the cell's land use in the history's first (base) year |
//!
//! A non-agricultural cell that was already non-agricultural in the base
//! year has no reference row and may not move to any agricultural use.
//! Finally the current `(m, j)` of every agricultural cell is always legal.

use ndarray::{Array3, s};

use lu_core::{AgLandUse, LandMgmt, LandUseHistory, LandUseMaps, Year};
use lu_data::DomainData;

use crate::TransitionResult;

/// Build `x_mrj` for a solve whose current state is the history entry at
/// `base_year`.
pub fn exclusion_matrix(
    data:      &DomainData,
    history:   &LandUseHistory,
    base_year: Year,
) -> TransitionResult<Array3<bool>> {
    let current = history.get(base_year)?;
    let (_, reference) = history.base();
    check_cells(data, current)?;

    let t_ij = &data.ag_transition_costs;
    let mut x_mrj = data.static_exclusion.clone();
    let mut orphaned = 0usize;

    for r in 0..current.n_cells() {
        match legality_row(current, reference, r) {
            Some(i) => {
                for (j, cost) in t_ij.row(i.index()).iter().enumerate() {
                    if cost.is_nan() {
                        x_mrj.slice_mut(s![.., r, j]).fill(false);
                    }
                }
            }
            None => {
                x_mrj.slice_mut(s![.., r, ..]).fill(false);
                orphaned += 1;
            }
        }
        if let Some((m, j)) = current.current_ag(r) {
            x_mrj[[m.index(), r, j.index()]] = true;
        }
    }

    if orphaned > 0 {
        tracing::debug!(%base_year, cells = orphaned, "non-agricultural cells with no base-year agricultural use");
    }
    Ok(x_mrj)
}

/// Row of the transition table governing cell `r`'s options.
///
/// Agricultural cells use their current land use.  Non-agricultural cells
/// fall back to their base-year land use so that land taken out of
/// agriculture can still revert to what was possible there originally.
pub fn legality_row(current: &LandUseMaps, base: &LandUseMaps, r: usize) -> Option<AgLandUse> {
    match current.land_use(r).ag() {
        Some(i) => Some(i),
        None => base.land_use(r).ag(),
    }
}

/// Number of legal land uses for cell `r` under management `m`.
pub fn legal_count(x_mrj: &Array3<bool>, m: LandMgmt, r: usize) -> usize {
    x_mrj.slice(s![m.index(), r, ..]).iter().filter(|&&b| b).count()
}

pub(crate) fn check_cells(data: &DomainData, maps: &LandUseMaps) -> TransitionResult<()> {
    if maps.n_cells() != data.n_cells() {
        return Err(lu_core::CoreError::CellCountMismatch {
            expected: data.n_cells(),
            got:      maps.n_cells(),
            what:     "lumap",
        }
        .into());
    }
    Ok(())
}
