//! Plain data row types written by output backends.

/// Annualised transition cost actually incurred between two land uses,
/// summed over cells and weighted by the allocated share.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCostRow {
    pub year:      u16,
    pub from_lm:   &'static str,
    pub from_lu:   String,
    pub to_lm:     &'static str,
    pub to_lu:     String,
    /// `CostComponent::name`.
    pub component: &'static str,
    /// $.
    pub cost:      f64,
}

/// Area-weighted biodiversity score of one land use, overlay or
/// non-agricultural use.
#[derive(Debug, Clone, PartialEq)]
pub struct BiodiversityScoreRow {
    pub year:     u16,
    /// `"Agricultural Land-use"`, `"Agricultural Management"` or
    /// `"Non-Agricultural Land-use"`.
    pub kind:     &'static str,
    /// Overlay name for agricultural management rows, empty otherwise.
    pub overlay:  String,
    pub land_use: String,
    /// Land-management name; empty for non-agricultural rows.
    pub lm:       &'static str,
    pub score:    f64,
}

/// One limit of one solve year, with what the accepted maps achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitRow {
    pub year:       u16,
    /// `"Biodiversity"`, `"Water"` or `"GHG"`.
    pub kind:       &'static str,
    /// Framework name or water regionalisation.
    pub group:      String,
    /// Category or region name.
    pub name:       String,
    pub limit:      f64,
    /// In-study-area score of the accepted maps (biodiversity only).
    pub achieved:   Option<f64>,
    /// `achieved` as a percentage of the all-Australia score.
    pub pct:        Option<f64>,
    /// `limit` as a percentage of the all-Australia score.
    pub target_pct: Option<f64>,
}
