//! `lu-transition`: exclusion matrices and transition costs.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`exclusion`] | `exclusion_matrix` (`x_mrj`), `legality_row`              |
//! | [`cost`]      | `transition_costs` (`t_mrj`), `transition_cost_breakdown`, `TransitionCosts` |
//! | [`amortise`]  | annuity amortisation                                      |
//! | [`water`]     | `WaterRequirementModel` seam, `DomainWaterRequirement`    |
//! | [`error`]     | `TransitionError`, `TransitionResult`                     |
//!
//! # Call pattern
//!
//! ```rust,ignore
//! let costs = transition_costs(&data, &settings, &DomainWaterRequirement, &history, Year(2010), Year(2020))?;
//! if let Some(c) = costs.legal_cost(LandMgmt::IRRIGATED, r, j) { … }
//! ```

pub mod amortise;
pub mod cost;
pub mod error;
pub mod exclusion;
pub mod water;

#[cfg(test)]
mod tests;

pub use amortise::{amortise, amortise_with, annuity_factor, payment_factor};
pub use cost::{
    CostBreakdown, CostComponent, TransitionCosts, transition_cost_breakdown, transition_costs,
};
pub use error::{TransitionError, TransitionResult};
pub use exclusion::{exclusion_matrix, legal_count, legality_row};
pub use water::{DomainWaterRequirement, WaterRequirementModel};
