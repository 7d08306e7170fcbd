//! Reference inputs of the score-based biodiversity frameworks (vegetation
//! groups, species and communities of national significance, and
//! climate-resilience groups/species).
//!
//! Every framework has the same shape:
//!
//! | Field                    | Shape       | Meaning                                   |
//! |--------------------------|-------------|-------------------------------------------|
//! | `names`                  | `v`         | category names                            |
//! | `layers`                 | `(v, r)`    | share of category `v`'s value in cell `r`  |
//! | `outside_baseline`       | `v`         | score outside the study area              |
//! | `all_australia_baseline` | `v`         | score across the whole continent          |
//! | `targets`                | `v`         | percentage targets by anchor year         |
//!
//! Layers and baselines are year series; static frameworks carry a single
//! anchor.

use lu_core::TargetTimeline;
use ndarray::{Ix1, Ix2};

use crate::{DataError, DataResult, YearSeries};

#[derive(Clone, Debug)]
pub struct ScoreFrameworkData {
    pub names:                  Vec<String>,
    pub layers:                 YearSeries<Ix2>,
    pub outside_baseline:       YearSeries<Ix1>,
    pub all_australia_baseline: YearSeries<Ix1>,
    pub targets:                Vec<TargetTimeline>,
}

impl ScoreFrameworkData {
    /// Validate that every part agrees on the number of categories and that
    /// layers cover `n_cells` cells.
    pub fn new(
        names:                  Vec<String>,
        layers:                 YearSeries<Ix2>,
        outside_baseline:       YearSeries<Ix1>,
        all_australia_baseline: YearSeries<Ix1>,
        targets:                Vec<TargetTimeline>,
        n_cells:                usize,
    ) -> DataResult<Self> {
        let n_cat = names.len();
        if layers.is_empty() || outside_baseline.is_empty() || all_australia_baseline.is_empty() {
            return Err(DataError::Parse("framework needs at least one anchor year per series".into()));
        }
        if let Some(s) = layers.shape() {
            if s != [n_cat, n_cells].as_slice() {
                return Err(DataError::shape("framework layers", [n_cat, n_cells], s));
            }
        }
        for (what, series) in [
            ("outside-study-area baseline", &outside_baseline),
            ("all-Australia baseline", &all_australia_baseline),
        ] {
            if let Some(s) = series.shape() {
                if s != [n_cat].as_slice() {
                    return Err(DataError::shape(what, [n_cat], s));
                }
            }
        }
        if targets.len() != n_cat {
            return Err(DataError::shape("framework targets", n_cat, targets.len()));
        }
        Ok(Self { names, layers, outside_baseline, all_australia_baseline, targets })
    }

    #[inline]
    pub fn n_categories(&self) -> usize {
        self.names.len()
    }
}
