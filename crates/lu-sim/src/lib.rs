//! `lu-sim`: year loop orchestrator for the land-use matrix engine.
//!
//! # Year loop
//!
//! ```text
//! for (base, target) in settings.sim_years.windows(2):
//!   ① Inputs: x_mrj, t_mrj, biodiversity tensors, limits for target.
//!   ② Solve: Optimizer::solve(&YearInputs) → Allocation.
//!   ③ Accept: validate shares, derive lumap/lmmap (dominant option).
//!   ④ Append: history.push(target, maps).
//! ```
//!
//! The matrix engines are pure functions of their inputs; only the loop
//! writes history.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lu_sim::{HoldCurrentOptimizer, NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(settings, data, base_maps, HoldCurrentOptimizer).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod allocation;
pub mod builder;
pub mod context;
pub mod error;
pub mod observer;
pub mod optimizer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use allocation::Allocation;
pub use builder::SimBuilder;
pub use context::YearInputs;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use optimizer::{HoldCurrentOptimizer, Optimizer};
pub use sim::Sim;
