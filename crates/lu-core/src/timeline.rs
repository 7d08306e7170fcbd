//! Sparse year → value timelines and the interpolation policy shared by every
//! limit, target, and time-varying layer.
//!
//! # Policy
//!
//! | Requested year                 | Result                                  |
//! |--------------------------------|-----------------------------------------|
//! | equal to an anchor             | that anchor's value                     |
//! | strictly between two anchors   | linear interpolation                    |
//! | after the last anchor          | last anchor's value (hold)              |
//! | before the first anchor        | first anchor's value (hold)             |
//!
//! Callers that must reject years before some bound (e.g. the run's base
//! year) check that bound themselves; the timeline never errors.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{CoreError, Year};

/// Locate `year` among the keys of `anchors`.
///
/// Returns `(lo, hi, w)` such that the interpolated value is
/// `value[lo] * (1 - w) + value[hi] * w`.  `lo == hi` (and `w == 0`) for an
/// exact hit or a clamped year.  `None` only when `anchors` is empty.
pub fn bracket<T>(anchors: &BTreeMap<Year, T>, year: Year) -> Option<(Year, Year, f64)> {
    let before = anchors.range(..=year).next_back().map(|(y, _)| *y);
    let after = anchors.range(year..).next().map(|(y, _)| *y);

    match (before, after) {
        (Some(lo), Some(hi)) if lo == hi => Some((lo, lo, 0.0)),
        (Some(lo), Some(hi)) => {
            let w = f64::from(year.since(lo)) / f64::from(hi.since(lo));
            Some((lo, hi, w))
        }
        (Some(lo), None) => Some((lo, lo, 0.0)),
        (None, Some(hi)) => Some((hi, hi, 0.0)),
        (None, None) => None,
    }
}

/// A sparse mapping from calendar year to a scalar limit or target.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct TargetTimeline {
    anchors: BTreeMap<Year, f64>,
}

impl TargetTimeline {
    pub fn new(anchors: BTreeMap<Year, f64>) -> Self {
        Self { anchors }
    }

    /// Build from `(year, value)` pairs; later duplicates overwrite earlier ones.
    pub fn from_pairs<I: IntoIterator<Item = (u16, f64)>>(pairs: I) -> Self {
        Self { anchors: pairs.into_iter().map(|(y, v)| (Year(y), v)).collect() }
    }

    /// Return a copy with an extra anchor.  An existing anchor at `year` is kept.
    pub fn with_anchor(&self, year: Year, value: f64) -> Self {
        let mut anchors = self.anchors.clone();
        anchors.entry(year).or_insert(value);
        Self { anchors }
    }

    pub fn anchors(&self) -> &BTreeMap<Year, f64> {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.anchors.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.anchors.keys().next_back().copied()
    }

    /// Value at `year` under the module-level interpolation policy.
    pub fn value_at(&self, year: Year) -> Option<f64> {
        let (lo, hi, w) = bracket(&self.anchors, year)?;
        let a = self.anchors[&lo];
        let b = self.anchors[&hi];
        Some(a * (1.0 - w) + b * w)
    }
}

impl TryFrom<BTreeMap<String, f64>> for TargetTimeline {
    type Error = CoreError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let anchors = raw
            .into_iter()
            .map(|(k, v)| {
                let year = k.parse::<Year>().map_err(|_| {
                    CoreError::Settings(format!("timeline key {k:?} is not a calendar year"))
                })?;
                if !v.is_finite() {
                    return Err(CoreError::Settings(format!("timeline value for {year} is not finite")));
                }
                Ok((year, v))
            })
            .collect::<Result<_, CoreError>>()?;
        Ok(Self { anchors })
    }
}
