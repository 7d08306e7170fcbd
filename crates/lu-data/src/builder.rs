//! Fluent builder for [`DomainData`].
//!
//! # Required inputs
//!
//! - [`LandUseTaxonomy`]: fixes `N_AG_LUS` and `N_NONAG_LUS`
//! - cell areas: fixes `NCELLS`
//!
//! # Optional inputs (have defaults)
//!
//! | Method                       | Default                                      |
//! |------------------------------|----------------------------------------------|
//! | `.static_exclusion(x)`       | every `(m, r, j)` legal                      |
//! | `.bio_priority(v)`           | all zero                                     |
//! | `.connectivity_nci(v)`       | not loaded                                   |
//! | `.connectivity_dwi(v)`       | not loaded                                   |
//! | `.savanna_eligible(v)`       | no cell eligible                             |
//! | `.water_licence_price(v)`    | all zero                                     |
//! | `.drainage_divisions(w)`     | not loaded                                   |
//! | `.river_regions(w)`          | not loaded                                   |
//! | `.ag_transition_costs(t)`    | every transition allowed at zero cost        |
//! | `.water_requirement(w)`      | all zero                                     |
//! | `.hcas(p, c)`                | 50th only: natural land uses 1, others 0     |
//! | `.ag_habitat_contribution(c)`| shorthand for `.hcas(50, c)`                 |
//! | `.biochar(b)`                | empty (multiplier 1 everywhere)              |
//! | `.framework(f, d)`           | none                                         |
//! | `.ghg_limit_table(t)`        | none                                         |
//!
//! # Example
//!
//! ```rust,ignore
//! let data = DomainDataBuilder::new(taxonomy, areas)
//!     .bio_priority(priority)
//!     .savanna_eligible(eligible)
//!     .ag_transition_costs(load_transition_table_csv(path, &taxonomy)?)
//!     .build()?;
//! ```

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3};

use lu_core::{BiodiversityFramework, LandMgmt, LandUseTaxonomy};

use crate::{
    BiocharMultipliers, DataError, DataResult, DomainData, GhgLimitTable, ScoreFrameworkData,
    WaterRegions,
};

pub struct DomainDataBuilder {
    taxonomy:                LandUseTaxonomy,
    real_area:               Vec<f64>,
    static_exclusion:        Option<Array3<bool>>,
    bio_priority:            Option<Vec<f64>>,
    connectivity_nci:        Option<Vec<f64>>,
    connectivity_dwi:        Option<Vec<f64>>,
    savanna_eligible:        Option<Vec<bool>>,
    water_licence_price:     Option<Vec<f64>>,
    drainage_divisions:      Option<WaterRegions>,
    river_regions:           Option<WaterRegions>,
    ag_transition_costs:     Option<Array2<f64>>,
    water_requirement:       Option<Array3<f64>>,
    hcas:                    BTreeMap<u8, Vec<f64>>,
    biochar:                 BiocharMultipliers,
    frameworks:              BTreeMap<BiodiversityFramework, ScoreFrameworkData>,
    ghg_limit_table:         Option<GhgLimitTable>,
}

impl DomainDataBuilder {
    pub fn new(taxonomy: LandUseTaxonomy, real_area: Vec<f64>) -> Self {
        Self {
            taxonomy,
            real_area,
            static_exclusion:        None,
            bio_priority:            None,
            connectivity_nci:        None,
            connectivity_dwi:        None,
            savanna_eligible:        None,
            water_licence_price:     None,
            drainage_divisions:      None,
            river_regions:           None,
            ag_transition_costs:     None,
            water_requirement:       None,
            hcas:                    BTreeMap::new(),
            biochar:                 BiocharMultipliers::default(),
            frameworks:              BTreeMap::new(),
            ghg_limit_table:         None,
        }
    }

    /// Base-year legal combinations, shape `(NLMS, NCELLS, N_AG_LUS)`.
    pub fn static_exclusion(mut self, x_mrj: Array3<bool>) -> Self {
        self.static_exclusion = Some(x_mrj);
        self
    }

    pub fn bio_priority(mut self, v: Vec<f64>) -> Self {
        self.bio_priority = Some(v);
        self
    }

    pub fn connectivity_nci(mut self, v: Vec<f64>) -> Self {
        self.connectivity_nci = Some(v);
        self
    }

    pub fn connectivity_dwi(mut self, v: Vec<f64>) -> Self {
        self.connectivity_dwi = Some(v);
        self
    }

    pub fn savanna_eligible(mut self, v: Vec<bool>) -> Self {
        self.savanna_eligible = Some(v);
        self
    }

    pub fn water_licence_price(mut self, v: Vec<f64>) -> Self {
        self.water_licence_price = Some(v);
        self
    }

    pub fn drainage_divisions(mut self, w: WaterRegions) -> Self {
        self.drainage_divisions = Some(w);
        self
    }

    pub fn river_regions(mut self, w: WaterRegions) -> Self {
        self.river_regions = Some(w);
        self
    }

    /// Raw `(from, to)` establishment-cost table, $/ha; NaN = not allowed.
    pub fn ag_transition_costs(mut self, t_ij: Array2<f64>) -> Self {
        self.ag_transition_costs = Some(t_ij);
        self
    }

    /// Water requirement, ML/ha, shape `(NLMS, NCELLS, N_AG_LUS)`.
    pub fn water_requirement(mut self, w_mrj: Array3<f64>) -> Self {
        self.water_requirement = Some(w_mrj);
        self
    }

    /// HCAS contribution of every agricultural land use at `percentile`.
    pub fn hcas(mut self, percentile: u8, c_j: Vec<f64>) -> Self {
        self.hcas.insert(percentile, c_j);
        self
    }

    /// The 50th-percentile HCAS contribution.
    pub fn ag_habitat_contribution(self, c_j: Vec<f64>) -> Self {
        self.hcas(50, c_j)
    }

    pub fn biochar(mut self, b: BiocharMultipliers) -> Self {
        self.biochar = b;
        self
    }

    /// Reference inputs of one score-based framework.  GBF2 is derived from
    /// the priority layer and is rejected here.
    pub fn framework(mut self, framework: BiodiversityFramework, d: ScoreFrameworkData) -> Self {
        self.frameworks.insert(framework, d);
        self
    }

    pub fn ghg_limit_table(mut self, t: GhgLimitTable) -> Self {
        self.ghg_limit_table = Some(t);
        self
    }

    /// Validate shapes and ranges and return the immutable [`DomainData`].
    pub fn build(self) -> DataResult<DomainData> {
        let n_cells = self.real_area.len();
        let n_ag = self.taxonomy.n_ag();
        let mrj = (LandMgmt::COUNT, n_cells, n_ag);

        // ── Per cell ──────────────────────────────────────────────────────
        check_values("real_area", &self.real_area, |a| a >= 0.0)?;
        let real_area = Array1::from(self.real_area);

        let static_exclusion = match self.static_exclusion {
            Some(x) => {
                check_shape3("static exclusion", &x, mrj)?;
                x
            }
            None => Array3::from_elem(mrj, true),
        };

        let bio_priority = per_cell("bio_priority", self.bio_priority, n_cells, 0.0)?;
        check_values("bio_priority", &bio_priority, |v| v >= 0.0)?;

        let connectivity_nci = self
            .connectivity_nci
            .map(|v| unit_layer("connectivity_nci", v, n_cells))
            .transpose()?;
        let connectivity_dwi = self
            .connectivity_dwi
            .map(|v| unit_layer("connectivity_dwi", v, n_cells))
            .transpose()?;

        let savanna_eligible = match self.savanna_eligible {
            Some(v) if v.len() != n_cells => {
                return Err(DataError::shape("savanna_eligible", n_cells, v.len()));
            }
            Some(v) => Array1::from(v),
            None => Array1::from_elem(n_cells, false),
        };

        let water_licence_price = per_cell("water_licence_price", self.water_licence_price, n_cells, 0.0)?;
        check_values("water_licence_price", &water_licence_price, |v| v >= 0.0)?;

        for (what, regions) in [
            ("drainage divisions", &self.drainage_divisions),
            ("river regions", &self.river_regions),
        ] {
            if let Some(w) = regions {
                check_regions(what, w, n_cells)?;
            }
        }

        // ── Per land use ──────────────────────────────────────────────────
        let ag_transition_costs = match self.ag_transition_costs {
            Some(t) => {
                if t.dim() != (n_ag, n_ag) {
                    return Err(DataError::shape("transition table", (n_ag, n_ag), t.dim()));
                }
                // NaN marks a disallowed transition; anything else must be a real cost.
                if let Some((index, &value)) = t
                    .iter()
                    .enumerate()
                    .find(|(_, v)| v.is_infinite() || **v < 0.0)
                {
                    return Err(DataError::InvalidValue { what: "transition table", index, value });
                }
                t
            }
            None => Array2::zeros((n_ag, n_ag)),
        };

        let water_requirement = match self.water_requirement {
            Some(w) => {
                check_shape3("water requirement", &w, mrj)?;
                if let Some((index, &value)) = w.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                    return Err(DataError::InvalidValue { what: "water requirement", index, value });
                }
                w
            }
            None => Array3::zeros(mrj),
        };

        let mut hcas = BTreeMap::new();
        for (percentile, c) in self.hcas {
            if c.len() != n_ag {
                return Err(DataError::shape("habitat contribution", n_ag, c.len()));
            }
            check_values("habitat contribution", &c, |v| (0.0..=1.0).contains(&v))?;
            hcas.insert(percentile, Array1::from(c));
        }
        if hcas.is_empty() {
            let natural = self.taxonomy.natural_land_uses();
            let c = self.taxonomy.ag_ids().map(|j| if natural.contains(&j) { 1.0 } else { 0.0 });
            hcas.insert(50, Array1::from_iter(c));
        }

        // ── Targets ───────────────────────────────────────────────────────
        if self.frameworks.contains_key(&BiodiversityFramework::Gbf2) {
            return Err(DataError::Parse(
                "GBF2 is derived from the priority layer and takes no framework data".into(),
            ));
        }
        for (fw, d) in &self.frameworks {
            if let Some(s) = d.layers.shape() {
                if s.get(1) != Some(&n_cells) {
                    return Err(DataError::shape("framework layers", n_cells, s));
                }
            }
            tracing::debug!(framework = fw.name(), categories = d.n_categories(), "framework data attached");
        }

        let data = DomainData {
            taxonomy: self.taxonomy,
            real_area,
            static_exclusion,
            bio_priority,
            connectivity_nci,
            connectivity_dwi,
            savanna_eligible,
            water_licence_price,
            drainage_divisions: self.drainage_divisions,
            river_regions: self.river_regions,
            ag_transition_costs,
            water_requirement,
            hcas,
            biochar: self.biochar,
            frameworks: self.frameworks,
            ghg_limit_table: self.ghg_limit_table,
        };
        tracing::info!(
            cells = data.n_cells(),
            ag_land_uses = data.n_ag(),
            non_ag_land_uses = data.n_non_ag(),
            "domain data built"
        );
        Ok(data)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn per_cell(what: &'static str, v: Option<Vec<f64>>, n_cells: usize, default: f64) -> DataResult<Array1<f64>> {
    match v {
        Some(v) if v.len() != n_cells => Err(DataError::shape(what, n_cells, v.len())),
        Some(v) => Ok(Array1::from(v)),
        None => Ok(Array1::from_elem(n_cells, default)),
    }
}

fn unit_layer(what: &'static str, v: Vec<f64>, n_cells: usize) -> DataResult<Array1<f64>> {
    let a = per_cell(what, Some(v), n_cells, 0.0)?;
    check_values(what, &a, |x| (0.0..=1.0).contains(&x))?;
    Ok(a)
}

fn check_values<'a>(
    what: &'static str,
    v:    impl IntoIterator<Item = &'a f64>,
    ok:   impl Fn(f64) -> bool,
) -> DataResult<()> {
    match v.into_iter().enumerate().find(|&(_, &x)| !x.is_finite() || !ok(x)) {
        Some((index, &value)) => Err(DataError::InvalidValue { what, index, value }),
        None => Ok(()),
    }
}

fn check_shape3<T>(what: &'static str, a: &Array3<T>, expected: (usize, usize, usize)) -> DataResult<()> {
    if a.dim() == expected {
        Ok(())
    } else {
        Err(DataError::shape(what, expected, a.dim()))
    }
}

fn check_regions(what: &'static str, w: &WaterRegions, n_cells: usize) -> DataResult<()> {
    if w.region_r.len() != n_cells {
        return Err(DataError::shape(what, n_cells, w.region_r.len()));
    }
    for id in &w.region_r {
        if !w.names.contains_key(id) || !w.historical_yield.contains_key(id) {
            return Err(DataError::Parse(format!("{what}: region {id} has no name or historical yield")));
        }
    }
    Ok(())
}
