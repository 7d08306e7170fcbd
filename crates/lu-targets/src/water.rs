//! Water net-yield limits.
//!
//! Each region of the selected regionalisation must keep at least
//!
//! ```text
//! limit = historical_yield · (1 − water_stress · ag_share_of_water_use)
//! ```
//!
//! of its historical yield.  Limits do not vary by year.

use std::collections::BTreeMap;

use lu_core::{Settings, WaterRegionDef};
use lu_data::DomainData;

use crate::{TargetError, TargetResult};

#[derive(Clone, Debug, PartialEq)]
pub struct RegionLimit {
    pub name:  String,
    /// Cells of the region, ascending.
    pub cells: Vec<usize>,
    /// Minimum net yield, ML.
    pub limit: f64,
}

#[derive(Clone, Debug)]
pub struct WaterLimits {
    pub region_def: WaterRegionDef,
    pub regions:    BTreeMap<u16, RegionLimit>,
}

impl WaterLimits {
    pub fn get(&self, region: u16) -> Option<&RegionLimit> {
        self.regions.get(&region)
    }
}

/// Per-region limits; `None` when water limits are switched off.
pub fn water_limits(data: &DomainData, settings: &Settings) -> TargetResult<Option<WaterLimits>> {
    let ws = &settings.water;
    if !ws.limits_enabled {
        return Ok(None);
    }
    let regions = data.water_regions(ws.region_def)?;
    let factor = 1.0 - ws.water_stress * ws.ag_share_of_water_use;

    let mut limits = BTreeMap::new();
    for id in regions.ids() {
        let hist = *regions.historical_yield.get(&id).ok_or(TargetError::MissingYield(id))?;
        limits.insert(
            id,
            RegionLimit {
                name:  regions.names.get(&id).cloned().unwrap_or_default(),
                cells: regions.cells(id),
                limit: hist * factor,
            },
        );
    }

    tracing::debug!(region_def = ?ws.region_def, regions = limits.len(), "water limits resolved");
    Ok(Some(WaterLimits { region_def: ws.region_def, regions: limits }))
}
