//! Strongly typed, zero-cost index wrappers.
//!
//! Every tensor in the engine is indexed by one or more of these ids.  The
//! inner integer is `pub` so hot loops can index `ndarray` axes directly via
//! `id.0 as usize`, but callers should prefer the `.index()` helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed id wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid id".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a tensor axis index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agricultural land use (`j`) in the lexicographic taxonomy.
    pub struct AgLandUse(u16);
}

typed_id! {
    /// Index of a non-agricultural land use (`k`).
    pub struct NonAgLandUse(u16);
}

typed_id! {
    /// Land-management type (`m`).  Two values in the current model, but
    /// every tensor treats it as an enumerable axis of length [`LandMgmt::COUNT`].
    pub struct LandMgmt(u8);
}

impl LandMgmt {
    pub const DRYLAND: LandMgmt = LandMgmt(0);
    pub const IRRIGATED: LandMgmt = LandMgmt(1);

    /// Length of the `m` axis of every `*_mrj` tensor.
    pub const COUNT: usize = 2;

    /// All land-management types in axis order.
    pub const ALL: [LandMgmt; Self::COUNT] = [Self::DRYLAND, Self::IRRIGATED];

    pub fn name(self) -> &'static str {
        match self {
            Self::DRYLAND => "dry",
            Self::IRRIGATED => "irr",
            _ => "invalid",
        }
    }
}
