//! Every limit of one solve year.

use lu_core::{BiodiversityFramework, LandUseHistory, Settings, Year};
use lu_data::DomainData;

use crate::biodiversity::{FrameworkLimits, biodiversity_limits};
use crate::ghg::ghg_limit;
use crate::water::{WaterLimits, water_limits};
use crate::TargetResult;

#[derive(Clone, Debug)]
pub struct Limits {
    pub year:         Year,
    /// One entry per framework in [`BiodiversityFramework::ALL`] order.
    pub biodiversity: Vec<FrameworkLimits>,
    pub water:        Option<WaterLimits>,
    /// tCO2e.
    pub ghg:          Option<f64>,
}

impl Limits {
    pub fn framework(&self, fw: BiodiversityFramework) -> Option<&FrameworkLimits> {
        self.biodiversity.iter().find(|l| l.framework == fw)
    }
}

pub fn resolve_limits(
    data:     &DomainData,
    settings: &Settings,
    history:  &LandUseHistory,
    year:     Year,
) -> TargetResult<Limits> {
    let limits = Limits {
        year,
        biodiversity: biodiversity_limits(data, settings, history, year)?,
        water:        water_limits(data, settings)?,
        ghg:          ghg_limit(data, settings, year)?,
    };
    tracing::info!(
        %year,
        frameworks = limits.biodiversity.iter().filter(|f| !f.is_empty()).count(),
        water_regions = limits.water.as_ref().map_or(0, |w| w.regions.len()),
        ghg = ?limits.ghg,
        "limits resolved"
    );
    Ok(limits)
}
