//! GHG emission limits.
//!
//! | `limits_type` | Source                                      | Missing year        |
//! |---------------|---------------------------------------------|---------------------|
//! | `dict`        | `settings.ghg.limits`, interpolated          | held at the ends    |
//! | `file`        | `DomainData::ghg_limit_table`, exact lookup | error               |
//!
//! In `file` mode `settings.ghg.limits_field` names the scenario column.

use lu_core::{GhgLimitsType, Settings, Year};
use lu_data::DomainData;

use crate::{TargetError, TargetResult};

/// Maximum net emissions for `year`, tCO2e; `None` when GHG limits are off.
pub fn ghg_limit(data: &DomainData, settings: &Settings, year: Year) -> TargetResult<Option<f64>> {
    let ghg = &settings.ghg;
    if !ghg.limits_enabled {
        return Ok(None);
    }
    let limit = match ghg.limits_type {
        GhgLimitsType::Dict => ghg.limits.value_at(year).ok_or(TargetError::MissingGhgYear(year))?,
        GhgLimitsType::File => {
            let table = data.ghg_limit_table.as_ref().ok_or(TargetError::MissingGhgTable)?;
            let limits = table
                .scenario(&ghg.limits_field)
                .ok_or_else(|| TargetError::MissingGhgField(ghg.limits_field.clone()))?;
            *limits.get(&year).ok_or(TargetError::MissingGhgYear(year))?
        }
    };
    tracing::debug!(%year, limit, "GHG limit resolved");
    Ok(Some(limit))
}
