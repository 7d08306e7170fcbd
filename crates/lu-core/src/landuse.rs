//! Land-use taxonomy and agricultural-management overlays.
//!
//! Agricultural land uses are indexed lexicographically by name (`j`), which
//! is also the row/column order of the raw transition-cost table.
//! Non-agricultural land uses (`k`) appear on land-use maps offset by
//! [`NON_AGRICULTURAL_LU_BASE_CODE`], so a single `u16` code identifies
//! either kind.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{AgLandUse, CoreError, CoreResult, NonAgLandUse};

/// Non-agricultural land use `k` is written as `k + 100` on land-use maps.
pub const NON_AGRICULTURAL_LU_BASE_CODE: u16 = 100;

/// The 28 agricultural land uses of the national model, lexicographic.
pub const STANDARD_AG_LAND_USES: [&str; 28] = [
    "Apples",
    "Beef - modified land",
    "Beef - natural land",
    "Citrus",
    "Cotton",
    "Dairy - modified land",
    "Dairy - natural land",
    "Grapes",
    "Hay",
    "Nuts",
    "Other non-cereal crops",
    "Pears",
    "Plantation fruit",
    "Rice",
    "Sheep - modified land",
    "Sheep - natural land",
    "Stone fruit",
    "Sugar",
    "Summer cereals",
    "Summer legumes",
    "Summer oilseeds",
    "Tropical stone fruit",
    "Unallocated - modified land",
    "Unallocated - natural land",
    "Vegetables",
    "Winter cereals",
    "Winter legumes",
    "Winter oilseeds",
];

/// Non-agricultural land uses in `k` order.
pub const STANDARD_NON_AG_LAND_USES: [&str; 9] = [
    "Environmental Plantings",
    "Riparian Plantings",
    "Sheep Agroforestry",
    "Beef Agroforestry",
    "Carbon Plantings (Block)",
    "Sheep Carbon Plantings (Belt)",
    "Beef Carbon Plantings (Belt)",
    "BECCS",
    "Destocked - natural land",
];

pub const UNALLOCATED_NATURAL_LAND: &str = "Unallocated - natural land";

const CROPPING: [&str; 7] = [
    "Hay", "Summer cereals", "Summer legumes", "Summer oilseeds",
    "Winter cereals", "Winter legumes", "Winter oilseeds",
];
const INTENSIVE_CROPPING: [&str; 5] = [
    "Cotton", "Other non-cereal crops", "Rice", "Sugar", "Vegetables",
];
const HORTICULTURE: [&str; 8] = [
    "Apples", "Citrus", "Grapes", "Nuts", "Pears", "Plantation fruit",
    "Stone fruit", "Tropical stone fruit",
];

// ── LandUse ───────────────────────────────────────────────────────────────────

/// The land use a cell holds on a land-use map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LandUse {
    Ag(AgLandUse),
    NonAg(NonAgLandUse),
}

impl LandUse {
    /// Map code: `j` for agricultural, `k + 100` for non-agricultural.
    pub fn code(self) -> u16 {
        match self {
            LandUse::Ag(j) => j.0,
            LandUse::NonAg(k) => NON_AGRICULTURAL_LU_BASE_CODE + k.0,
        }
    }

    /// Decode a map code against a taxonomy's sizes.
    pub fn from_code(code: u16, n_ag: usize, n_non_ag: usize) -> CoreResult<LandUse> {
        if (code as usize) < n_ag {
            return Ok(LandUse::Ag(AgLandUse(code)));
        }
        match code.checked_sub(NON_AGRICULTURAL_LU_BASE_CODE) {
            Some(k) if (k as usize) < n_non_ag => Ok(LandUse::NonAg(NonAgLandUse(k))),
            _ => Err(CoreError::InvalidLandUseCode(code)),
        }
    }

    #[inline]
    pub fn is_agricultural(self) -> bool {
        matches!(self, LandUse::Ag(_))
    }

    #[inline]
    pub fn ag(self) -> Option<AgLandUse> {
        match self {
            LandUse::Ag(j) => Some(j),
            LandUse::NonAg(_) => None,
        }
    }
}

impl fmt::Display for LandUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandUse::Ag(j) => write!(f, "ag:{}", j.0),
            LandUse::NonAg(k) => write!(f, "non-ag:{}", k.0),
        }
    }
}

// ── AgManagement ──────────────────────────────────────────────────────────────

/// Agricultural-management overlays.  Each applies to a fixed subset of
/// agricultural land uses (see [`AgManagement::land_use_names`]).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum AgManagement {
    #[serde(rename = "Asparagopsis taxiformis")]
    Asparagopsis,
    #[serde(rename = "Precision Agriculture")]
    PrecisionAgriculture,
    #[serde(rename = "Ecological Grazing")]
    EcologicalGrazing,
    #[serde(rename = "Savanna Burning")]
    SavannaBurning,
    #[serde(rename = "AgTech EI")]
    AgTechEi,
    #[serde(rename = "Biochar")]
    Biochar,
    #[serde(rename = "Beef - HIR")]
    BeefHir,
    #[serde(rename = "Sheep - HIR")]
    SheepHir,
}

impl AgManagement {
    pub const ALL: [AgManagement; 8] = [
        Self::Asparagopsis,
        Self::PrecisionAgriculture,
        Self::EcologicalGrazing,
        Self::SavannaBurning,
        Self::AgTechEi,
        Self::Biochar,
        Self::BeefHir,
        Self::SheepHir,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Asparagopsis => "Asparagopsis taxiformis",
            Self::PrecisionAgriculture => "Precision Agriculture",
            Self::EcologicalGrazing => "Ecological Grazing",
            Self::SavannaBurning => "Savanna Burning",
            Self::AgTechEi => "AgTech EI",
            Self::Biochar => "Biochar",
            Self::BeefHir => "Beef - HIR",
            Self::SheepHir => "Sheep - HIR",
        }
    }

    /// Names of the agricultural land uses this overlay may be applied to.
    pub fn land_use_names(self) -> Vec<&'static str> {
        match self {
            Self::Asparagopsis => vec![
                "Beef - modified land", "Sheep - modified land",
                "Dairy - natural land", "Dairy - modified land",
            ],
            Self::PrecisionAgriculture | Self::AgTechEi => CROPPING
                .iter()
                .chain(INTENSIVE_CROPPING.iter())
                .chain(HORTICULTURE.iter())
                .copied()
                .collect(),
            Self::EcologicalGrazing => vec![
                "Beef - modified land", "Sheep - modified land", "Dairy - modified land",
            ],
            Self::SavannaBurning => vec![
                "Beef - natural land", "Dairy - natural land",
                "Sheep - natural land", UNALLOCATED_NATURAL_LAND,
            ],
            Self::Biochar => CROPPING.iter().chain(HORTICULTURE.iter()).copied().collect(),
            Self::BeefHir => vec!["Beef - natural land"],
            Self::SheepHir => vec!["Sheep - natural land"],
        }
    }
}

impl fmt::Display for AgManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── LandUseTaxonomy ───────────────────────────────────────────────────────────

/// Names and name lookups for both land-use families.
#[derive(Clone, Debug)]
pub struct LandUseTaxonomy {
    ag_names:     Vec<String>,
    non_ag_names: Vec<String>,
    ag_index:     FxHashMap<String, AgLandUse>,
    non_ag_index: FxHashMap<String, NonAgLandUse>,
}

impl LandUseTaxonomy {
    /// Build a taxonomy.  Names must be unique within each family.
    pub fn new<S: Into<String>>(
        ag_names:     impl IntoIterator<Item = S>,
        non_ag_names: impl IntoIterator<Item = S>,
    ) -> CoreResult<Self> {
        let ag_names: Vec<String> = ag_names.into_iter().map(Into::into).collect();
        let non_ag_names: Vec<String> = non_ag_names.into_iter().map(Into::into).collect();

        let mut ag_index = FxHashMap::default();
        for (j, name) in ag_names.iter().enumerate() {
            let id = AgLandUse::try_from(j)
                .map_err(|_| CoreError::Settings("too many agricultural land uses".into()))?;
            if ag_index.insert(name.clone(), id).is_some() {
                return Err(CoreError::Settings(format!("duplicate agricultural land use {name:?}")));
            }
        }

        let mut non_ag_index = FxHashMap::default();
        for (k, name) in non_ag_names.iter().enumerate() {
            let id = NonAgLandUse::try_from(k)
                .map_err(|_| CoreError::Settings("too many non-agricultural land uses".into()))?;
            if non_ag_index.insert(name.clone(), id).is_some() {
                return Err(CoreError::Settings(format!("duplicate non-agricultural land use {name:?}")));
            }
        }

        Ok(Self { ag_names, non_ag_names, ag_index, non_ag_index })
    }

    /// The national 28 + 9 land-use taxonomy.
    pub fn standard() -> Self {
        let ag_names: Vec<String> = STANDARD_AG_LAND_USES.iter().map(|s| s.to_string()).collect();
        let non_ag_names: Vec<String> =
            STANDARD_NON_AG_LAND_USES.iter().map(|s| s.to_string()).collect();
        let ag_index = ag_names
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), AgLandUse(j as u16)))
            .collect();
        let non_ag_index = non_ag_names
            .iter()
            .enumerate()
            .map(|(k, name)| (name.clone(), NonAgLandUse(k as u16)))
            .collect();
        Self { ag_names, non_ag_names, ag_index, non_ag_index }
    }

    #[inline]
    pub fn n_ag(&self) -> usize {
        self.ag_names.len()
    }

    #[inline]
    pub fn n_non_ag(&self) -> usize {
        self.non_ag_names.len()
    }

    pub fn ag_names(&self) -> &[String] {
        &self.ag_names
    }

    pub fn non_ag_names(&self) -> &[String] {
        &self.non_ag_names
    }

    pub fn ag_name(&self, j: AgLandUse) -> &str {
        &self.ag_names[j.index()]
    }

    pub fn non_ag_name(&self, k: NonAgLandUse) -> &str {
        &self.non_ag_names[k.index()]
    }

    pub fn name(&self, lu: LandUse) -> &str {
        match lu {
            LandUse::Ag(j) => self.ag_name(j),
            LandUse::NonAg(k) => self.non_ag_name(k),
        }
    }

    pub fn find_ag(&self, name: &str) -> Option<AgLandUse> {
        self.ag_index.get(name).copied()
    }

    pub fn find_non_ag(&self, name: &str) -> Option<NonAgLandUse> {
        self.non_ag_index.get(name).copied()
    }

    pub fn ag(&self, name: &str) -> CoreResult<AgLandUse> {
        self.find_ag(name).ok_or_else(|| CoreError::UnknownLandUse(name.to_owned()))
    }

    /// Decode a land-use map code.
    pub fn decode(&self, code: u16) -> CoreResult<LandUse> {
        LandUse::from_code(code, self.n_ag(), self.n_non_ag())
    }

    /// Agricultural land uses on natural (uncleared) land.
    pub fn natural_land_uses(&self) -> Vec<AgLandUse> {
        self.ag_ids().filter(|&j| self.ag_name(j).ends_with("natural land")).collect()
    }

    /// Beef, sheep and dairy land uses.
    pub fn livestock_land_uses(&self) -> Vec<AgLandUse> {
        self.ag_ids()
            .filter(|&j| {
                let name = self.ag_name(j);
                ["Beef", "Sheep", "Dairy"].iter().any(|p| name.starts_with(p))
            })
            .collect()
    }

    pub fn unallocated_natural(&self) -> CoreResult<AgLandUse> {
        self.ag(UNALLOCATED_NATURAL_LAND)
    }

    /// Eligible land uses of `am` that exist in this taxonomy, ascending `j`.
    pub fn overlay_land_uses(&self, am: AgManagement) -> Vec<AgLandUse> {
        let mut lus: Vec<AgLandUse> = am
            .land_use_names()
            .into_iter()
            .filter_map(|name| self.find_ag(name))
            .collect();
        lus.sort_unstable();
        lus
    }

    /// Iterator over all agricultural land uses in `j` order.
    pub fn ag_ids(&self) -> impl Iterator<Item = AgLandUse> + '_ {
        (0..self.ag_names.len() as u16).map(AgLandUse)
    }

    /// Iterator over all non-agricultural land uses in `k` order.
    pub fn non_ag_ids(&self) -> impl Iterator<Item = NonAgLandUse> + '_ {
        (0..self.non_ag_names.len() as u16).map(NonAgLandUse)
    }
}
