//! `lu-output`: tabular export of each accepted year.
//!
//! | Backend | Files created                                                  |
//! |---------|----------------------------------------------------------------|
//! | CSV     | `transition_costs.csv`, `biodiversity_scores.csv`, `limits.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `lu_sim::SimObserver`.  The rows
//! themselves come from the pure functions in [`tables`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use lu_output::{CsvWriter, SimOutputObserver};
//!
//! let mut obs = SimOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod tables;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{BiodiversityScoreRow, LimitRow, TransitionCostRow};
pub use tables::{biodiversity_score_rows, limit_rows, transition_cost_rows};
pub use writer::OutputWriter;
