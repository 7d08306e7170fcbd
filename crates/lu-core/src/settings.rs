//! Run configuration.
//!
//! `Settings` is an immutable value built once per run (typically from a TOML
//! file) and passed by reference into every engine call.  Every switch is a
//! named field; the defaults below reproduce the national reference run.
//!
//! ```toml
//! base_year = 2010
//! sim_years = [2010, 2030, 2050]
//!
//! [economics]
//! discount_rate = 0.07
//!
//! [ag_managements]
//! savanna_burning = false
//!
//! [biodiversity.gbf2.targets]
//! 2030 = 0.3
//! 2050 = 0.5
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::{AgManagement, CoreError, CoreResult, TargetTimeline, Year};

// ── Enumerated options ────────────────────────────────────────────────────────

/// Source of the connectivity score used to weight the raw priority layer.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
pub enum ConnectivitySource {
    /// National Connectivity Index.
    #[serde(rename = "NCI")]
    Nci,
    /// Distance to the nearest natural land.
    #[serde(rename = "DWI")]
    Dwi,
    #[serde(rename = "NONE")]
    None,
}

/// Source of the habitat share `c_j` each agricultural land use retains.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
pub enum HabitatCondition {
    /// Habitat Condition Assessment System layer at `hcas_percentile`.
    #[serde(rename = "HCAS")]
    Hcas,
    /// `habitat_condition_user_defined`, by land-use name.
    #[serde(rename = "USER_DEFINED")]
    UserDefined,
    /// Every agricultural land use retains the full value.
    #[serde(rename = "NONE")]
    None,
}

/// Percentiles available for the HCAS habitat-condition layer.
pub const HCAS_PERCENTILES: [u8; 5] = [10, 25, 50, 75, 90];

/// Regionalisation used to enforce water net-yield limits.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
pub enum WaterRegionDef {
    #[serde(rename = "Drainage Division")]
    DrainageDivision,
    #[serde(rename = "River Region")]
    RiverRegion,
}

/// Where GHG emission limits come from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhgLimitsType {
    /// Interpolate the `ghg.limits` anchors.
    Dict,
    /// Exact lookup in the externally supplied year table.
    File,
}

/// Independently targeted biodiversity frameworks.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BiodiversityFramework {
    /// Restore degraded priority areas (GBF target 2).
    Gbf2,
    /// Major vegetation groups (GBF target 3).
    Gbf3,
    /// Species of national environmental significance (GBF target 4).
    Gbf4Snes,
    /// Ecological communities of national environmental significance.
    Gbf4Ecnes,
    /// Climate-resilience suitability, species groups (GBF target 8).
    Gbf8Groups,
    /// Climate-resilience suitability, selected species (GBF target 8).
    Gbf8Species,
}

impl BiodiversityFramework {
    pub const ALL: [BiodiversityFramework; 6] = [
        Self::Gbf2,
        Self::Gbf3,
        Self::Gbf4Snes,
        Self::Gbf4Ecnes,
        Self::Gbf8Groups,
        Self::Gbf8Species,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Gbf2 => "GBF2",
            Self::Gbf3 => "GBF3",
            Self::Gbf4Snes => "GBF4-SNES",
            Self::Gbf4Ecnes => "GBF4-ECNES",
            Self::Gbf8Groups => "GBF8-GROUPS",
            Self::Gbf8Species => "GBF8-SPECIES",
        }
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Amortisation and transition-cost constants.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicSettings {
    /// Spread one-off transition costs over `amortisation_period` as an
    /// annuity.  When off they are charged whole in the solve year.
    /// Default: `true`.
    pub amortise_upfront_costs: bool,
    /// Discount rate for amortisation.  Default: 0.07 (7 % p.a.).
    pub discount_rate: f64,
    /// Amortisation period in years.  Default: 30.
    pub amortisation_period: u32,
    /// Establishing irrigation infrastructure, $/ha.  Default: 10 000.
    pub new_irrig_cost: f64,
    /// Removing irrigation infrastructure, $/ha.  Default: 5 000.
    pub remove_irrig_cost: f64,
    /// Charge for net water-licence changes.  Infrastructure surcharges are
    /// applied regardless.  Default: `true`.
    pub include_water_license_costs: bool,
}

impl Default for EconomicSettings {
    fn default() -> Self {
        Self {
            amortise_upfront_costs:      true,
            discount_rate:               0.07,
            amortisation_period:         30,
            new_irrig_cost:              10_000.0,
            remove_irrig_cost:           5_000.0,
            include_water_license_costs: true,
        }
    }
}

/// Enable switches for agricultural-management overlays.  All default on.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgManagementSettings {
    pub asparagopsis:          bool,
    pub precision_agriculture: bool,
    pub ecological_grazing:    bool,
    pub savanna_burning:       bool,
    pub agtech_ei:             bool,
    pub biochar:               bool,
    pub beef_hir:              bool,
    pub sheep_hir:             bool,
    /// Biodiversity penalty of HIR relative to destocked natural land,
    /// in `[0, 1]`.  Default: 0.5.
    pub hir_biodiversity_penalty: f64,
}

impl Default for AgManagementSettings {
    fn default() -> Self {
        Self {
            asparagopsis:             true,
            precision_agriculture:    true,
            ecological_grazing:       true,
            savanna_burning:          true,
            agtech_ei:                true,
            biochar:                  true,
            beef_hir:                 true,
            sheep_hir:                true,
            hir_biodiversity_penalty: 0.5,
        }
    }
}

impl AgManagementSettings {
    pub fn is_enabled(&self, am: AgManagement) -> bool {
        match am {
            AgManagement::Asparagopsis => self.asparagopsis,
            AgManagement::PrecisionAgriculture => self.precision_agriculture,
            AgManagement::EcologicalGrazing => self.ecological_grazing,
            AgManagement::SavannaBurning => self.savanna_burning,
            AgManagement::AgTechEi => self.agtech_ei,
            AgManagement::Biochar => self.biochar,
            AgManagement::BeefHir => self.beef_hir,
            AgManagement::SheepHir => self.sheep_hir,
        }
    }
}

/// Degraded-area restoration target (GBF2).
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Gbf2Settings {
    pub enabled: bool,
    /// Proportion of the degraded-area gap restored by each anchor year.
    pub targets: TargetTimeline,
    /// Share (0–100) of the degraded area, highest priority first, that forms
    /// the priority degraded-area mask.  Default: 50.
    pub priority_degraded_areas_percentage_cut: f64,
}

impl Default for Gbf2Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            targets: TargetTimeline::from_pairs([(2030, 0.3), (2050, 0.5), (2100, 0.5)]),
            priority_degraded_areas_percentage_cut: 50.0,
        }
    }
}

/// Habitat contribution of each non-agricultural land use, in `[0, 1]`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NonAgContributions {
    pub environmental_planting:  f64,
    pub riparian_planting:       f64,
    pub agroforestry:            f64,
    pub carbon_planting_block:   f64,
    pub carbon_planting_belt:    f64,
    pub beccs:                   f64,
}

impl Default for NonAgContributions {
    fn default() -> Self {
        Self {
            environmental_planting: 0.8,
            riparian_planting:      1.0,
            agroforestry:           0.75,
            carbon_planting_block:  0.1,
            carbon_planting_belt:   0.1,
            beccs:                  0.0,
        }
    }
}

impl NonAgContributions {
    /// Coefficient for a non-agricultural land use by name.
    ///
    /// `Destocked - natural land` is not listed: it takes the
    /// unallocated-natural-land coefficient from the reference data.
    pub fn by_name(&self, name: &str) -> Option<f64> {
        match name {
            "Environmental Plantings" => Some(self.environmental_planting),
            "Riparian Plantings" => Some(self.riparian_planting),
            "Sheep Agroforestry" | "Beef Agroforestry" => Some(self.agroforestry),
            "Carbon Plantings (Block)" => Some(self.carbon_planting_block),
            "Sheep Carbon Plantings (Belt)" | "Beef Carbon Plantings (Belt)" => {
                Some(self.carbon_planting_belt)
            }
            "BECCS" => Some(self.beccs),
            _ => None,
        }
    }
}

/// Biodiversity scoring parameters and framework switches.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiodiversitySettings {
    /// Share of the raw value retained under the default late-dry-season
    /// fire regime on savanna-burning-eligible cells.  Default: 0.8.
    pub lds_biodiversity_value: f64,
    pub connectivity_source: ConnectivitySource,
    /// Weight of connectivity in `[0, 1]`; the multiplier's lower bound is
    /// `1 - importance`.  Default: 0.3.
    pub connectivity_importance: f64,
    pub habitat_condition: HabitatCondition,
    /// One of [`HCAS_PERCENTILES`].  Default: 50.
    pub hcas_percentile: u8,
    /// `c_j` by agricultural land-use name, for `habitat_condition =
    /// "USER_DEFINED"`.
    pub habitat_condition_user_defined: BTreeMap<String, f64>,
    /// Share of the raw value lost where livestock graze natural land, in
    /// `[0, 1]`.  Default: 0.
    pub livestock_impact: f64,
    pub gbf2: Gbf2Settings,
    pub gbf3_enabled: bool,
    pub gbf4_snes_enabled: bool,
    pub gbf4_ecnes_enabled: bool,
    pub gbf8_groups_enabled: bool,
    pub gbf8_species_enabled: bool,
    pub non_ag_contributions: NonAgContributions,
}

impl Default for BiodiversitySettings {
    fn default() -> Self {
        Self {
            lds_biodiversity_value:         0.8,
            connectivity_source:            ConnectivitySource::Nci,
            connectivity_importance:        0.3,
            habitat_condition:              HabitatCondition::Hcas,
            hcas_percentile:                50,
            habitat_condition_user_defined: BTreeMap::new(),
            livestock_impact:               0.0,
            gbf2:                           Gbf2Settings::default(),
            gbf3_enabled:                   false,
            gbf4_snes_enabled:              false,
            gbf4_ecnes_enabled:             false,
            gbf8_groups_enabled:            false,
            gbf8_species_enabled:           false,
            non_ag_contributions:           NonAgContributions::default(),
        }
    }
}

impl BiodiversitySettings {
    pub fn is_enabled(&self, framework: BiodiversityFramework) -> bool {
        match framework {
            BiodiversityFramework::Gbf2 => self.gbf2.enabled,
            BiodiversityFramework::Gbf3 => self.gbf3_enabled,
            BiodiversityFramework::Gbf4Snes => self.gbf4_snes_enabled,
            BiodiversityFramework::Gbf4Ecnes => self.gbf4_ecnes_enabled,
            BiodiversityFramework::Gbf8Groups => self.gbf8_groups_enabled,
            BiodiversityFramework::Gbf8Species => self.gbf8_species_enabled,
        }
    }

    /// Lower bound of the connectivity multiplier.
    pub fn connectivity_lb(&self) -> f64 {
        1.0 - self.connectivity_importance
    }
}

/// Water net-yield limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterSettings {
    pub limits_enabled: bool,
    pub region_def: WaterRegionDef,
    /// Aqueduct water-stress level.  Default: 0.4.
    pub water_stress: f64,
    /// Agriculture's share of water use.  Default: 0.7.
    pub ag_share_of_water_use: f64,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            limits_enabled:        true,
            region_def:            WaterRegionDef::DrainageDivision,
            water_stress:          0.4,
            ag_share_of_water_use: 0.7,
        }
    }
}

/// GHG emission limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GhgSettings {
    pub limits_enabled: bool,
    pub limits_type: GhgLimitsType,
    /// Tonnes CO2e by anchor year, used when `limits_type = "dict"`.
    pub limits: TargetTimeline,
    /// Column of the external table, used when `limits_type = "file"`.
    pub limits_field: String,
}

impl Default for GhgSettings {
    fn default() -> Self {
        Self {
            limits_enabled: true,
            limits_type:    GhgLimitsType::Dict,
            limits:         TargetTimeline::from_pairs([
                (2010, 90.0e6),
                (2050, -100.0e6),
                (2100, -100.0e6),
            ]),
            limits_field:   "1.5C (67%) excl. avoided emis".to_owned(),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Calendar year of the observed base land-use map.  Default: 2010.
    pub base_year: Year,
    /// Years to solve, starting with `base_year`.  Default: 2010–2050 by 10.
    pub sim_years: Vec<Year>,
    pub economics: EconomicSettings,
    pub ag_managements: AgManagementSettings,
    pub biodiversity: BiodiversitySettings,
    pub water: WaterSettings,
    pub ghg: GhgSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_year:      Year(2010),
            sim_years:      (2010..=2050).step_by(10).map(Year).collect(),
            economics:      EconomicSettings::default(),
            ag_managements: AgManagementSettings::default(),
            biodiversity:   BiodiversitySettings::default(),
            water:          WaterSettings::default(),
            ghg:            GhgSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate TOML settings.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a TOML settings file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Years elapsed since `base_year`.
    ///
    /// Years before the base year are a fatal configuration error.
    pub fn year_index(&self, year: Year) -> CoreResult<u32> {
        year.index_from(self.base_year).ok_or_else(|| {
            CoreError::Settings(format!("year {year} precedes base year {}", self.base_year))
        })
    }

    /// Check ranges and orderings.  Called by the loaders; call it yourself
    /// when building `Settings` in code.
    pub fn validate(&self) -> CoreResult<()> {
        match self.sim_years.first() {
            None => return Err(invalid("sim_years is empty")),
            Some(&first) if first != self.base_year => {
                return Err(invalid(format!(
                    "sim_years must start at base_year {}, got {first}",
                    self.base_year
                )));
            }
            Some(_) => {}
        }
        if !self.sim_years.windows(2).all(|w| w[0] < w[1]) {
            return Err(invalid("sim_years must be strictly increasing"));
        }

        let eco = &self.economics;
        if !eco.discount_rate.is_finite() || eco.discount_rate <= -1.0 {
            return Err(invalid(format!("discount_rate {} out of range", eco.discount_rate)));
        }
        if eco.amortisation_period == 0 {
            return Err(invalid("amortisation_period must be at least 1 year"));
        }
        non_negative("new_irrig_cost", eco.new_irrig_cost)?;
        non_negative("remove_irrig_cost", eco.remove_irrig_cost)?;

        unit_interval("hir_biodiversity_penalty", self.ag_managements.hir_biodiversity_penalty)?;

        let bio = &self.biodiversity;
        unit_interval("lds_biodiversity_value", bio.lds_biodiversity_value)?;
        unit_interval("connectivity_importance", bio.connectivity_importance)?;
        unit_interval("livestock_impact", bio.livestock_impact)?;
        if !HCAS_PERCENTILES.contains(&bio.hcas_percentile) {
            return Err(invalid(format!(
                "hcas_percentile {} not one of {HCAS_PERCENTILES:?}",
                bio.hcas_percentile
            )));
        }
        for (name, &v) in &bio.habitat_condition_user_defined {
            unit_interval(name, v)?;
        }
        let cut = bio.gbf2.priority_degraded_areas_percentage_cut;
        if !(0.0..=100.0).contains(&cut) {
            return Err(invalid(format!("priority_degraded_areas_percentage_cut {cut} not in [0, 100]")));
        }
        for (&year, &p) in bio.gbf2.targets.anchors() {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("GBF2 target {p} for {year} not in [0, 1]")));
            }
        }
        let c = &bio.non_ag_contributions;
        for (name, v) in [
            ("environmental_planting", c.environmental_planting),
            ("riparian_planting", c.riparian_planting),
            ("agroforestry", c.agroforestry),
            ("carbon_planting_block", c.carbon_planting_block),
            ("carbon_planting_belt", c.carbon_planting_belt),
            ("beccs", c.beccs),
        ] {
            unit_interval(name, v)?;
        }

        unit_interval("water_stress", self.water.water_stress)?;
        unit_interval("ag_share_of_water_use", self.water.ag_share_of_water_use)?;

        if self.ghg.limits_enabled
            && self.ghg.limits_type == GhgLimitsType::Dict
            && self.ghg.limits.is_empty()
        {
            return Err(invalid("ghg.limits must have at least one anchor"));
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::Settings(msg.into())
}

fn unit_interval(name: &str, v: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(format!("{name} {v} not in [0, 1]")))
    }
}

fn non_negative(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} {v} must be a non-negative number")))
    }
}
