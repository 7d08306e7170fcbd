//! The `Optimizer` trait: the seam where a solver plugs into the year loop.

use crate::{Allocation, SimResult, YearInputs};

/// Chooses next year's allocation from one year's inputs.
///
/// Implementations must return an [`Allocation`] over the same cells and
/// land uses as `inputs.data`; the year loop validates it before deriving
/// the new land-use maps.  Transitions that `inputs.costs.x_mrj` forbids
/// should carry zero share.
///
/// # Example
///
/// ```rust,ignore
/// struct CheapestLegal;
///
/// impl Optimizer for CheapestLegal {
///     fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation> {
///         let mut alloc = Allocation::hold(inputs.current, inputs.data.n_ag(), inputs.data.n_non_ag())?;
///         // … move cells to the cheapest legal (m, j) …
///         Ok(alloc)
///     }
/// }
/// ```
pub trait Optimizer {
    fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation>;
}

/// An [`Optimizer`] that keeps every cell as it is.
///
/// Every current `(m, j)` is legal and free, so the held allocation is
/// always feasible with respect to the exclusion matrix.
pub struct HoldCurrentOptimizer;

impl Optimizer for HoldCurrentOptimizer {
    fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation> {
        Allocation::hold(inputs.current, inputs.data.n_ag(), inputs.data.n_non_ag())
    }
}
