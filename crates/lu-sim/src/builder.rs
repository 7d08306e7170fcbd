//! Fluent builder for constructing a [`Sim`].

use lu_core::{LandUseHistory, LandUseMaps, Settings};
use lu_data::DomainData;
use lu_transition::{DomainWaterRequirement, WaterRequirementModel};

use crate::{Optimizer, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<O>`].
///
/// # Required inputs
///
/// - [`Settings`]: validated on `build`
/// - [`DomainData`]: from [`lu_data::DomainDataBuilder`]
/// - the base-year [`LandUseMaps`]
/// - `O: Optimizer`
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                     |
/// |----------------------|---------------------------------------------|
/// | `.water_model(w)`    | [`DomainWaterRequirement`]                  |
/// | `.history(h)`        | a history holding only the base-year maps   |
/// | `.cost_breakdown(b)` | `false`: only total transition costs        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(settings, data, base_maps, HoldCurrentOptimizer)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<O: Optimizer> {
    settings:       Settings,
    data:           DomainData,
    base_maps:      LandUseMaps,
    optimizer:      O,
    water:          Option<Box<dyn WaterRequirementModel>>,
    history:        Option<LandUseHistory>,
    cost_breakdown: bool,
}

impl<O: Optimizer> SimBuilder<O> {
    pub fn new(settings: Settings, data: DomainData, base_maps: LandUseMaps, optimizer: O) -> Self {
        Self { settings, data, base_maps, optimizer, water: None, history: None, cost_breakdown: false }
    }

    pub fn water_model(mut self, water: Box<dyn WaterRequirementModel>) -> Self {
        self.water = Some(water);
        self
    }

    /// Resume from an existing history.  Its base year must be
    /// `settings.base_year` and its latest year one of `settings.sim_years`;
    /// the run continues with the following year.  The base maps given to
    /// [`SimBuilder::new`] are ignored.
    pub fn history(mut self, history: LandUseHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Keep establishment and water-licence costs as separate tensors each
    /// year, for observers that report them by component.
    pub fn cost_breakdown(mut self, keep: bool) -> Self {
        self.cost_breakdown = keep;
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<O>> {
        self.settings.validate()?;
        let n_cells = self.data.n_cells();

        let history = match self.history {
            Some(h) => h,
            None => LandUseHistory::new(self.settings.base_year, self.base_maps),
        };
        if history.n_cells() != n_cells {
            return Err(SimError::CellCountMismatch {
                expected: n_cells,
                got:      history.n_cells(),
                what:     "land-use history",
            });
        }
        let (base_year, _) = history.base();
        if base_year != self.settings.base_year {
            return Err(SimError::Config(format!(
                "history starts in {base_year}, settings.base_year is {}",
                self.settings.base_year
            )));
        }
        let (latest, _) = history.latest();
        let Some(pos) = self.settings.sim_years.iter().position(|&y| y == latest) else {
            return Err(SimError::Config(format!("history year {latest} is not a simulation year")));
        };

        tracing::info!(
            cells = n_cells,
            ag_land_uses = self.data.n_ag(),
            non_ag_land_uses = self.data.n_non_ag(),
            years = self.settings.sim_years.len(),
            resume_from = %latest,
            "simulation built"
        );

        Ok(Sim {
            settings:       self.settings,
            data:           self.data,
            history,
            optimizer:      self.optimizer,
            water:          self.water.unwrap_or_else(|| Box::new(DomainWaterRequirement)),
            cost_breakdown: self.cost_breakdown,
            next:           pos + 1,
        })
    }
}
