//! Re-projection of one year's tensors onto named rows.
//!
//! Every table is a pure function of the year's inputs and the accepted
//! allocation, so the same rows can be written by any backend.

use std::collections::BTreeMap;

use lu_core::{AgLandUse, LandMgmt, WaterRegionDef};
use lu_sim::{Allocation, YearInputs};

use crate::{BiodiversityScoreRow, LimitRow, OutputResult, TransitionCostRow};

pub const KIND_AG: &str = "Agricultural Land-use";
pub const KIND_AG_MAN: &str = "Agricultural Management";
pub const KIND_NON_AG: &str = "Non-Agricultural Land-use";

// ── Transition costs ──────────────────────────────────────────────────────────

/// Costs incurred by moving agricultural cells from their current `(m0, i)`
/// to the allocated `(m, j)`, per component when the year's costs carry a
/// breakdown and as one total otherwise.  Staying put is omitted.
pub fn transition_cost_rows(inputs: &YearInputs<'_>, allocation: &Allocation) -> Vec<TransitionCostRow> {
    let tax = &inputs.data.taxonomy;
    let costs = &inputs.costs;
    let (_, n_cells, n_ag) = allocation.ag_mrj.dim();
    let year = inputs.target_year.0;

    let mut rows = Vec::new();
    for &component in costs.reported_components() {
        let Some(c_mrj) = costs.component(component) else { continue };
        let mut totals: BTreeMap<(LandMgmt, AgLandUse, LandMgmt, AgLandUse), f64> = BTreeMap::new();

        for r in 0..n_cells {
            let Some((m0, i)) = inputs.current.current_ag(r) else { continue };
            for m in LandMgmt::ALL {
                for j in 0..n_ag {
                    let share = allocation.ag_mrj[[m.index(), r, j]];
                    let to = AgLandUse(j as u16);
                    if share <= 0.0 || (m, to) == (m0, i) {
                        continue;
                    }
                    if let Some(cost) = costs.is_legal(m, r, j).then(|| c_mrj[[m.index(), r, j]]) {
                        *totals.entry((m0, i, m, to)).or_default() += cost * share;
                    }
                }
            }
        }

        rows.extend(totals.into_iter().map(|((m0, i, m, j), cost)| TransitionCostRow {
            year,
            from_lm: m0.name(),
            from_lu: tax.ag_name(i).to_owned(),
            to_lm: m.name(),
            to_lu: tax.ag_name(j).to_owned(),
            component: component.name(),
            cost,
        }));
    }
    rows
}

// ── Biodiversity scores ───────────────────────────────────────────────────────

/// Area-weighted scores of every allocated land use, overlay and
/// non-agricultural use.
pub fn biodiversity_score_rows(inputs: &YearInputs<'_>, allocation: &Allocation) -> Vec<BiodiversityScoreRow> {
    let tax = &inputs.data.taxonomy;
    let bio = &inputs.biodiversity;
    let year = inputs.target_year.0;
    let mut rows = Vec::new();

    for m in LandMgmt::ALL {
        for j in tax.ag_ids() {
            let shares = allocation.ag_mrj.slice(ndarray::s![m.index(), .., j.index()]);
            if shares.iter().all(|&x| x <= 0.0) {
                continue;
            }
            let b_r = bio.b_mrj.slice(ndarray::s![m.index(), .., j.index()]);
            rows.push(BiodiversityScoreRow {
                year,
                kind: KIND_AG,
                overlay: String::new(),
                land_use: tax.ag_name(j).to_owned(),
                lm: m.name(),
                score: b_r.dot(&shares),
            });
        }
    }

    for effect in bio.overlays.iter() {
        let Some(x_mrj) = allocation.ag_man.get(&effect.management) else { continue };
        if x_mrj.dim() != effect.delta_mrj.dim() {
            tracing::warn!(
                overlay = effect.management.name(),
                got = ?x_mrj.dim(),
                expected = ?effect.delta_mrj.dim(),
                "overlay shares have the wrong shape; skipped"
            );
            continue;
        }
        for m in LandMgmt::ALL {
            for (jj, &j) in effect.land_uses.iter().enumerate() {
                let shares = x_mrj.slice(ndarray::s![m.index(), .., jj]);
                if shares.iter().all(|&x| x <= 0.0) {
                    continue;
                }
                let delta_r = effect.delta_mrj.slice(ndarray::s![m.index(), .., jj]);
                rows.push(BiodiversityScoreRow {
                    year,
                    kind: KIND_AG_MAN,
                    overlay: effect.management.name().to_owned(),
                    land_use: tax.ag_name(j).to_owned(),
                    lm: m.name(),
                    score: delta_r.dot(&shares),
                });
            }
        }
    }

    for k in tax.non_ag_ids() {
        let shares = allocation.non_ag_rk.column(k.index());
        if shares.iter().all(|&x| x <= 0.0) {
            continue;
        }
        rows.push(BiodiversityScoreRow {
            year,
            kind: KIND_NON_AG,
            overlay: String::new(),
            land_use: tax.non_ag_name(k).to_owned(),
            lm: "",
            score: bio.non_ag_b_rk.column(k.index()).dot(&shares),
        });
    }
    rows
}

// ── Limits ────────────────────────────────────────────────────────────────────

fn region_def_name(def: WaterRegionDef) -> &'static str {
    match def {
        WaterRegionDef::DrainageDivision => "Drainage Division",
        WaterRegionDef::RiverRegion => "River Region",
    }
}

/// Every enabled limit of the year, with the biodiversity scores the
/// allocation achieves against it.  Scores count every share, overlays
/// included, not just each cell's dominant use.
pub fn limit_rows(inputs: &YearInputs<'_>, allocation: &Allocation) -> OutputResult<Vec<LimitRow>> {
    let year = inputs.target_year.0;
    let limits = &inputs.limits;
    let mut rows = Vec::new();

    let fraction_r = inputs.biodiversity.allocated_fraction_r(
        &allocation.ag_mrj,
        &allocation.non_ag_rk,
        &allocation.ag_man,
    )?;
    for fl in limits.biodiversity.iter().filter(|fl| !fl.is_empty()) {
        let (achieved, pct) = match inputs.biodiversity.framework(fl.framework) {
            Some(layers) if layers.n_categories() == fl.names.len() => {
                let achieved = layers.scores(&fraction_r);
                let pct = fl.percentage(&achieved);
                (Some(achieved), Some(pct))
            }
            _ => (None, None),
        };
        let target_pct = fl.target_pct_v();
        for (v, (name, limit)) in fl.iter().enumerate() {
            rows.push(LimitRow {
                year,
                kind: "Biodiversity",
                group: fl.framework.name().to_owned(),
                name: name.to_owned(),
                limit,
                achieved: achieved.as_ref().map(|a| a[v]),
                pct: pct.as_ref().map(|p| p[v]),
                target_pct: Some(target_pct[v]),
            });
        }
    }

    if let Some(water) = &limits.water {
        for region in water.regions.values() {
            rows.push(LimitRow {
                year,
                kind: "Water",
                group: region_def_name(water.region_def).to_owned(),
                name: region.name.clone(),
                limit: region.limit,
                achieved: None,
                pct: None,
                target_pct: None,
            });
        }
    }

    if let Some(ghg) = limits.ghg {
        rows.push(LimitRow {
            year,
            kind: "GHG",
            group: String::new(),
            name: "Net emissions".to_owned(),
            limit: ghg,
            achieved: None,
            pct: None,
            target_pct: None,
        });
    }
    Ok(rows)
}
