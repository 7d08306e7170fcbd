//! Calendar-year time model.
//!
//! # Design
//!
//! The simulation advances in whole calendar years.  Every per-year quantity
//! is keyed by an absolute [`Year`]; the *year index* used by sibling
//! economic modules is derived relative to the run's base year:
//!
//!   yr_idx = year - base_year
//!
//! Years are small integers, so all anchor arithmetic is exact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An absolute calendar year (e.g. `Year(2030)`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub u16);

impl Year {
    /// Years elapsed from `base` to `self`, or `None` if `self` precedes `base`.
    #[inline]
    pub fn index_from(self, base: Year) -> Option<u32> {
        self.0.checked_sub(base.0).map(u32::from)
    }

    /// Signed distance in years.
    #[inline]
    pub fn since(self, earlier: Year) -> i32 {
        i32::from(self.0) - i32::from(earlier.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u16>().map(Year)
    }
}
