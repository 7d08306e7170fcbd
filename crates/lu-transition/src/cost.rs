//! Transition-cost matrices `t_mrj`.
//!
//! For every agricultural cell `r` currently under `(m0, i)` and every
//! candidate `(m, j)`:
//!
//! ```text
//! establishment = amortise(t_ij[i, j])                              · area_r
//! water         = amortise((w[m,r,j] − w[m0,r,i]) · price_r + surcharge) · area_r
//! surcharge     = new_irrig_cost     if m0 = dry and m = irr
//!                 remove_irrig_cost  if m0 = irr and m = dry
//!                 0                  otherwise
//! t             = establishment + water
//! ```
//!
//! then `t[m0, r, i] = 0` and `t = NaN` wherever `x_mrj` is false.
//! Non-agricultural cells carry zero before the NaN overlay; their
//! reversion costs belong to the non-agricultural transition module.
//!
//! With `economics.amortise_upfront_costs` off, `amortise(x)` is `x`.
//!
//! Only `t_mrj` and `x_mrj` are kept by default.  The per-component
//! tensors double the footprint, so [`transition_cost_breakdown`] builds
//! them only for callers that report costs by component.
//!
//! # NaN contract
//!
//! NaN marks a forbidden transition and is meant to poison any arithmetic
//! that forgets to filter it.  New code should prefer
//! [`TransitionCosts::is_legal`] and [`TransitionCosts::legal_cost`].

use ndarray::{Array2, Array3, Zip};

use lu_core::{LandMgmt, LandUseHistory, LandUseMaps, Settings, Year};
use lu_data::DomainData;

use crate::amortise::amortise_inplace;
use crate::exclusion::{check_cells, exclusion_matrix};
use crate::water::{WaterRequirementModel, checked_water_requirement};
use crate::{TransitionError, TransitionResult};

/// Cost components, in the order they are reported.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CostComponent {
    Establishment,
    WaterLicence,
    /// Sum of every component; all that is reported without a breakdown.
    Total,
}

impl CostComponent {
    /// The components that partition [`CostComponent::Total`].
    pub const PARTS: [CostComponent; 2] = [Self::Establishment, Self::WaterLicence];

    pub fn name(self) -> &'static str {
        match self {
            Self::Establishment => "Establishment cost",
            Self::WaterLicence => "Water license cost",
            Self::Total => "Total cost",
        }
    }
}

/// Per-component tensors of `t_mrj`, same masking.
#[derive(Clone, Debug)]
pub struct CostBreakdown {
    pub establishment_mrj: Array3<f64>,
    /// Water-licence and irrigation-infrastructure component.
    pub water_mrj:         Array3<f64>,
}

/// One year's transition costs and the exclusion matrix they were masked with.
#[derive(Clone, Debug)]
pub struct TransitionCosts {
    pub base_year:   Year,
    pub target_year: Year,
    /// Annualised $ per cell; NaN where forbidden.
    pub t_mrj:       Array3<f64>,
    pub x_mrj:       Array3<bool>,
    /// Present only when built by [`transition_cost_breakdown`].
    pub breakdown:   Option<CostBreakdown>,
}

impl TransitionCosts {
    #[inline]
    pub fn is_legal(&self, m: LandMgmt, r: usize, j: usize) -> bool {
        self.x_mrj[[m.index(), r, j]]
    }

    /// Cost of a legal transition; `None` when forbidden.
    #[inline]
    pub fn legal_cost(&self, m: LandMgmt, r: usize, j: usize) -> Option<f64> {
        self.is_legal(m, r, j).then(|| self.t_mrj[[m.index(), r, j]])
    }

    /// The tensor of one component; `None` for a part that was not kept.
    pub fn component(&self, c: CostComponent) -> Option<&Array3<f64>> {
        match (c, &self.breakdown) {
            (CostComponent::Total, _) => Some(&self.t_mrj),
            (CostComponent::Establishment, Some(b)) => Some(&b.establishment_mrj),
            (CostComponent::WaterLicence, Some(b)) => Some(&b.water_mrj),
            (_, None) => None,
        }
    }

    /// Components available for reporting: the parts when kept, else the total.
    pub fn reported_components(&self) -> &'static [CostComponent] {
        if self.breakdown.is_some() { &CostComponent::PARTS } else { &[CostComponent::Total] }
    }

    /// `t_mrj` with forbidden entries replaced by `fill`, for consumers that
    /// cannot carry NaN.
    pub fn filled(&self, fill: f64) -> Array3<f64> {
        let mut t = self.t_mrj.clone();
        Zip::from(&mut t).and(&self.x_mrj).for_each(|t, &legal| {
            if !legal {
                *t = fill;
            }
        });
        t
    }
}

/// Build the exclusion matrix and transition costs for moving from the
/// history entry at `base_year` to `target_year`.
pub fn transition_costs(
    data:        &DomainData,
    settings:    &Settings,
    water:       &dyn WaterRequirementModel,
    history:     &LandUseHistory,
    base_year:   Year,
    target_year: Year,
) -> TransitionResult<TransitionCosts> {
    build_costs(data, settings, water, history, base_year, target_year, false)
}

/// [`transition_costs`] with [`TransitionCosts::breakdown`] filled in.
pub fn transition_cost_breakdown(
    data:        &DomainData,
    settings:    &Settings,
    water:       &dyn WaterRequirementModel,
    history:     &LandUseHistory,
    base_year:   Year,
    target_year: Year,
) -> TransitionResult<TransitionCosts> {
    build_costs(data, settings, water, history, base_year, target_year, true)
}

fn build_costs(
    data:        &DomainData,
    settings:    &Settings,
    water:       &dyn WaterRequirementModel,
    history:     &LandUseHistory,
    base_year:   Year,
    target_year: Year,
    keep_parts:  bool,
) -> TransitionResult<TransitionCosts> {
    if target_year <= base_year {
        return Err(TransitionError::SolveYearOrder { base: base_year, target: target_year });
    }
    settings.year_index(base_year)?;
    let yr_idx = settings.year_index(target_year)?;

    let current = history.get(base_year)?;
    check_cells(data, current)?;
    let x_mrj = exclusion_matrix(data, history, base_year)?;
    let w_mrj = checked_water_requirement(water, data, target_year)?;

    let eco = &settings.economics;
    let n_cells = data.n_cells();
    let n_ag = data.n_ag();
    let shape = (LandMgmt::COUNT, n_cells, n_ag);

    // ── Establishment ($/ha upfront → $/cell/yr) ──────────────────────────
    let mut t_rj = Array2::<f64>::zeros((n_cells, n_ag));
    for r in 0..n_cells {
        if let Some((_, i)) = current.current_ag(r) {
            t_rj.row_mut(r).assign(&data.ag_transition_costs.row(i.index()));
        }
    }
    amortise_inplace(&mut t_rj, eco);
    Zip::from(t_rj.rows_mut())
        .and(&data.real_area)
        .for_each(|mut row, &area| row *= area);

    // ── Water licence + irrigation infrastructure ─────────────────────────
    let mut w_delta_mrj = Array3::<f64>::zeros(shape);
    for r in 0..n_cells {
        let Some((m0, i)) = current.current_ag(r) else { continue };
        let w_r = w_mrj[[m0.index(), r, i.index()]];
        let price = data.water_licence_price[r];
        for m in LandMgmt::ALL {
            let surcharge = match (m0, m) {
                (LandMgmt::DRYLAND, LandMgmt::IRRIGATED) => eco.new_irrig_cost,
                (LandMgmt::IRRIGATED, LandMgmt::DRYLAND) => eco.remove_irrig_cost,
                _ => 0.0,
            };
            for j in 0..n_ag {
                let licence = if eco.include_water_license_costs {
                    (w_mrj[[m.index(), r, j]] - w_r) * price
                } else {
                    0.0
                };
                w_delta_mrj[[m.index(), r, j]] = licence + surcharge;
            }
        }
    }
    amortise_inplace(&mut w_delta_mrj, eco);
    for m in 0..LandMgmt::COUNT {
        Zip::from(w_delta_mrj.index_axis_mut(ndarray::Axis(0), m).rows_mut())
            .and(&data.real_area)
            .for_each(|mut row, &area| row *= area);
    }

    // ── Combine, zero the no-op, mask the forbidden ───────────────────────
    // Rows of non-agricultural cells are already zero in both parts.
    let mut breakdown = keep_parts.then(|| CostBreakdown {
        establishment_mrj: Array3::from_shape_fn(shape, |(_, r, j)| t_rj[[r, j]]),
        water_mrj:         w_delta_mrj.clone(),
    });
    let mut t_mrj = w_delta_mrj;
    Zip::indexed(&mut t_mrj).for_each(|(_, r, j), t| *t += t_rj[[r, j]]);

    settle(&mut t_mrj, current, &x_mrj);
    if let Some(b) = &mut breakdown {
        settle(&mut b.establishment_mrj, current, &x_mrj);
        settle(&mut b.water_mrj, current, &x_mrj);
    }

    tracing::debug!(
        %base_year,
        %target_year,
        yr_idx,
        legal = x_mrj.iter().filter(|&&b| b).count(),
        "transition costs built"
    );

    Ok(TransitionCosts { base_year, target_year, t_mrj, x_mrj, breakdown })
}

/// Zero each cell's current `(m0, i)` and poison forbidden entries.
fn settle(a: &mut Array3<f64>, current: &LandUseMaps, x_mrj: &Array3<bool>) {
    for r in 0..current.n_cells() {
        if let Some((m0, i)) = current.current_ag(r) {
            a[[m0.index(), r, i.index()]] = 0.0;
        }
    }
    Zip::from(a).and(x_mrj).for_each(|t, &legal| {
        if !legal {
            *t = f64::NAN;
        }
    });
}
