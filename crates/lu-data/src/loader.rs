//! CSV loaders for reference data.
//!
//! Every table has a `load_*_csv(path, …)` entry point and a
//! `load_*_reader(reader, …)` twin that accepts any `Read` source (pass a
//! `std::io::Cursor` in tests).  Land uses are referred to by name and
//! resolved against the run's [`LandUseTaxonomy`].
//!
//! # Formats
//!
//! | Loader                  | Columns                                                        |
//! |-------------------------|----------------------------------------------------------------|
//! | cell table              | `cell,area,bio_priority,nci,dwi,savanna_eligible,water_licence_price` |
//! | transition table        | `from,to,cost` (empty `cost` or absent pair = not allowed)     |
//! | habitat contribution    | `land_use,contribution`                                        |
//! | HCAS percentiles        | `percentile,land_use,contribution`                             |
//! | biochar multipliers     | `year,land_use,multiplier`                                     |
//! | category layers         | `year,category,cell,value`                                     |
//! | category baselines      | `year,category,outside_study_area,all_australia`               |
//! | category targets        | `category,year,target_pct`                                     |
//! | water region cells      | `cell,region`                                                  |
//! | water regions           | `region,name,historical_yield`                                 |
//! | GHG limits              | `YEAR,<scenario columns…>`                                     |
//!
//! `nci` and `dwi` may be left empty; a column that is empty on every row
//! is treated as not loaded.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array1, Array2, Ix1, Ix2};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use lu_core::{LandUseTaxonomy, TargetTimeline, Year};

use crate::{
    BiocharMultipliers, DataError, DataResult, GhgLimitTable, ScoreFrameworkData, WaterRegions, YearSeries,
};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CellRecord {
    cell:                usize,
    area:                f64,
    bio_priority:        f64,
    nci:                 Option<f64>,
    dwi:                 Option<f64>,
    savanna_eligible:    u8,
    water_licence_price: f64,
}

#[derive(Deserialize)]
struct TransitionRecord {
    from: String,
    to:   String,
    cost: Option<f64>,
}

#[derive(Deserialize)]
struct ContributionRecord {
    land_use:     String,
    contribution: f64,
}

#[derive(Deserialize)]
struct HcasRecord {
    percentile:   u8,
    land_use:     String,
    contribution: f64,
}

#[derive(Deserialize)]
struct BiocharRecord {
    year:       u16,
    land_use:   String,
    multiplier: f64,
}

#[derive(Deserialize)]
struct LayerRecord {
    year:     u16,
    category: String,
    cell:     usize,
    value:    f64,
}

#[derive(Deserialize)]
struct BaselineRecord {
    year:               u16,
    category:           String,
    outside_study_area: f64,
    all_australia:      f64,
}

#[derive(Deserialize)]
struct TargetRecord {
    category:   String,
    year:       u16,
    target_pct: f64,
}

#[derive(Deserialize)]
struct RegionCellRecord {
    cell:   usize,
    region: u16,
}

#[derive(Deserialize)]
struct RegionRecord {
    region:           u16,
    name:             String,
    historical_yield: f64,
}

// ── Cell table ────────────────────────────────────────────────────────────────

/// Per-cell columns of the reference data, indexed by cell.
#[derive(Clone, Debug, Default)]
pub struct CellTable {
    pub area:                Vec<f64>,
    pub bio_priority:        Vec<f64>,
    pub connectivity_nci:    Option<Vec<f64>>,
    pub connectivity_dwi:    Option<Vec<f64>>,
    pub savanna_eligible:    Vec<bool>,
    pub water_licence_price: Vec<f64>,
}

impl CellTable {
    pub fn n_cells(&self) -> usize {
        self.area.len()
    }
}

pub fn load_cell_table_csv(path: &Path) -> DataResult<CellTable> {
    load_cell_table_reader(File::open(path)?)
}

/// Cells must be numbered `0..n` with no gaps; row order is free.
pub fn load_cell_table_reader<R: Read>(reader: R) -> DataResult<CellTable> {
    let mut rows: Vec<CellRecord> = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<_, _>>()?;
    rows.sort_by_key(|r| r.cell);
    if let Some((expected, row)) = rows.iter().enumerate().find(|(i, r)| r.cell != *i) {
        return Err(DataError::Parse(format!("cell table: expected cell {expected}, found {}", row.cell)));
    }

    let optional = |pick: fn(&CellRecord) -> Option<f64>, what: &str| -> DataResult<Option<Vec<f64>>> {
        let present = rows.iter().filter(|r| pick(r).is_some()).count();
        if present == 0 {
            return Ok(None);
        }
        if present != rows.len() {
            return Err(DataError::Parse(format!("cell table: column {what} is only partly filled")));
        }
        Ok(Some(rows.iter().filter_map(pick).collect()))
    };
    let connectivity_nci = optional(|r| r.nci, "nci")?;
    let connectivity_dwi = optional(|r| r.dwi, "dwi")?;

    let table = CellTable {
        area:                rows.iter().map(|r| r.area).collect(),
        bio_priority:        rows.iter().map(|r| r.bio_priority).collect(),
        connectivity_nci,
        connectivity_dwi,
        savanna_eligible:    rows.iter().map(|r| r.savanna_eligible != 0).collect(),
        water_licence_price: rows.iter().map(|r| r.water_licence_price).collect(),
    };
    tracing::debug!(cells = table.n_cells(), "loaded cell table");
    Ok(table)
}

// ── Land-use tables ───────────────────────────────────────────────────────────

/// Load the raw establishment-cost table as a `(from, to)` matrix in
/// taxonomy order.  Pairs that are absent or have an empty cost are NaN.
pub fn load_transition_table_csv(path: &Path, taxonomy: &LandUseTaxonomy) -> DataResult<Array2<f64>> {
    load_transition_table_reader(File::open(path)?, taxonomy)
}

pub fn load_transition_table_reader<R: Read>(reader: R, taxonomy: &LandUseTaxonomy) -> DataResult<Array2<f64>> {
    let n = taxonomy.n_ag();
    let mut t_ij = Array2::from_elem((n, n), f64::NAN);
    for row in csv::Reader::from_reader(reader).deserialize::<TransitionRecord>() {
        let row = row?;
        let from = taxonomy.ag(row.from.trim())?;
        let to = taxonomy.ag(row.to.trim())?;
        t_ij[[from.index(), to.index()]] = row.cost.unwrap_or(f64::NAN);
    }
    Ok(t_ij)
}

/// Habitat contribution of every agricultural land use; all must be listed.
pub fn load_habitat_contribution_csv(path: &Path, taxonomy: &LandUseTaxonomy) -> DataResult<Vec<f64>> {
    load_habitat_contribution_reader(File::open(path)?, taxonomy)
}

pub fn load_habitat_contribution_reader<R: Read>(reader: R, taxonomy: &LandUseTaxonomy) -> DataResult<Vec<f64>> {
    let mut c: Vec<Option<f64>> = vec![None; taxonomy.n_ag()];
    for row in csv::Reader::from_reader(reader).deserialize::<ContributionRecord>() {
        let row = row?;
        let j = taxonomy.ag(row.land_use.trim())?;
        c[j.index()] = Some(row.contribution);
    }
    complete_contribution(c, taxonomy, None)
}

/// HCAS contribution of every agricultural land use at each listed
/// percentile; every percentile must list all land uses.
pub fn load_hcas_csv(path: &Path, taxonomy: &LandUseTaxonomy) -> DataResult<BTreeMap<u8, Vec<f64>>> {
    load_hcas_reader(File::open(path)?, taxonomy)
}

pub fn load_hcas_reader<R: Read>(reader: R, taxonomy: &LandUseTaxonomy) -> DataResult<BTreeMap<u8, Vec<f64>>> {
    let mut by_percentile: BTreeMap<u8, Vec<Option<f64>>> = BTreeMap::new();
    for row in csv::Reader::from_reader(reader).deserialize::<HcasRecord>() {
        let row = row?;
        let j = taxonomy.ag(row.land_use.trim())?;
        by_percentile.entry(row.percentile).or_insert_with(|| vec![None; taxonomy.n_ag()])[j.index()] =
            Some(row.contribution);
    }
    by_percentile
        .into_iter()
        .map(|(p, c)| Ok((p, complete_contribution(c, taxonomy, Some(p))?)))
        .collect()
}

pub fn load_biochar_csv(path: &Path, taxonomy: &LandUseTaxonomy) -> DataResult<BiocharMultipliers> {
    load_biochar_reader(File::open(path)?, taxonomy)
}

pub fn load_biochar_reader<R: Read>(reader: R, taxonomy: &LandUseTaxonomy) -> DataResult<BiocharMultipliers> {
    let mut by_year: BTreeMap<Year, FxHashMap<_, f64>> = BTreeMap::new();
    for row in csv::Reader::from_reader(reader).deserialize::<BiocharRecord>() {
        let row = row?;
        let j = taxonomy.ag(row.land_use.trim())?;
        by_year.entry(Year(row.year)).or_default().insert(j, row.multiplier);
    }
    BiocharMultipliers::new(by_year)
}

// ── Framework tables ──────────────────────────────────────────────────────────

/// Load per-cell category layers.  Categories are numbered in order of first
/// appearance; cells absent for a (year, category) pair are zero.
pub fn load_category_layers_csv(path: &Path, n_cells: usize) -> DataResult<(Vec<String>, YearSeries<Ix2>)> {
    load_category_layers_reader(File::open(path)?, n_cells)
}

pub fn load_category_layers_reader<R: Read>(
    reader:  R,
    n_cells: usize,
) -> DataResult<(Vec<String>, YearSeries<Ix2>)> {
    let rows: Vec<LayerRecord> = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<_, _>>()?;

    let mut names: Vec<String> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for row in &rows {
        if !index.contains_key(&row.category) {
            index.insert(row.category.clone(), names.len());
            names.push(row.category.clone());
        }
    }

    let mut anchors: BTreeMap<Year, Array2<f64>> = BTreeMap::new();
    for row in rows {
        if row.cell >= n_cells {
            return Err(DataError::Parse(format!("category layer: cell {} out of range", row.cell)));
        }
        let v = index[&row.category];
        anchors
            .entry(Year(row.year))
            .or_insert_with(|| Array2::zeros((names.len(), n_cells)))[[v, row.cell]] = row.value;
    }
    Ok((names, YearSeries::new(anchors, "category layers")?))
}

/// Load outside-study-area and all-Australia baselines for the categories
/// in `names`.  Returns `(outside, all_australia)`.
pub fn load_category_baselines_csv(
    path:  &Path,
    names: &[String],
) -> DataResult<(YearSeries<Ix1>, YearSeries<Ix1>)> {
    load_category_baselines_reader(File::open(path)?, names)
}

pub fn load_category_baselines_reader<R: Read>(
    reader: R,
    names:  &[String],
) -> DataResult<(YearSeries<Ix1>, YearSeries<Ix1>)> {
    let index = category_index(names);
    let mut outside: BTreeMap<Year, Array1<f64>> = BTreeMap::new();
    let mut all: BTreeMap<Year, Array1<f64>> = BTreeMap::new();
    for row in csv::Reader::from_reader(reader).deserialize::<BaselineRecord>() {
        let row = row?;
        let v = *index
            .get(row.category.as_str())
            .ok_or_else(|| DataError::UnknownCategory(row.category.clone()))?;
        let year = Year(row.year);
        outside.entry(year).or_insert_with(|| Array1::zeros(names.len()))[v] = row.outside_study_area;
        all.entry(year).or_insert_with(|| Array1::zeros(names.len()))[v] = row.all_australia;
    }
    Ok((
        YearSeries::new(outside, "outside-study-area baseline")?,
        YearSeries::new(all, "all-Australia baseline")?,
    ))
}

/// Load percentage targets; categories without rows get an empty timeline.
pub fn load_category_targets_csv(path: &Path, names: &[String]) -> DataResult<Vec<TargetTimeline>> {
    load_category_targets_reader(File::open(path)?, names)
}

pub fn load_category_targets_reader<R: Read>(reader: R, names: &[String]) -> DataResult<Vec<TargetTimeline>> {
    let index = category_index(names);
    let mut anchors: Vec<BTreeMap<Year, f64>> = vec![BTreeMap::new(); names.len()];
    for row in csv::Reader::from_reader(reader).deserialize::<TargetRecord>() {
        let row = row?;
        let v = *index
            .get(row.category.as_str())
            .ok_or_else(|| DataError::UnknownCategory(row.category.clone()))?;
        if !(0.0..=100.0).contains(&row.target_pct) {
            return Err(DataError::InvalidValue { what: "target_pct", index: v, value: row.target_pct });
        }
        anchors[v].insert(Year(row.year), row.target_pct);
    }
    Ok(anchors.into_iter().map(TargetTimeline::new).collect())
}

/// Load one score-based framework from its three tables.
pub fn load_score_framework_csv(
    layers:    &Path,
    baselines: &Path,
    targets:   &Path,
    n_cells:   usize,
) -> DataResult<ScoreFrameworkData> {
    let (names, layer_series) = load_category_layers_csv(layers, n_cells)?;
    let (outside, all) = load_category_baselines_csv(baselines, &names)?;
    let targets = load_category_targets_csv(targets, &names)?;
    tracing::debug!(categories = names.len(), path = %layers.display(), "loaded framework");
    ScoreFrameworkData::new(names, layer_series, outside, all, targets, n_cells)
}

// ── Water regions ─────────────────────────────────────────────────────────────

pub fn load_water_regions_csv(cells: &Path, regions: &Path, n_cells: usize) -> DataResult<WaterRegions> {
    load_water_regions_reader(File::open(cells)?, File::open(regions)?, n_cells)
}

/// Every cell must be assigned to exactly one listed region.
pub fn load_water_regions_reader<R1: Read, R2: Read>(
    cells:   R1,
    regions: R2,
    n_cells: usize,
) -> DataResult<WaterRegions> {
    let mut names = BTreeMap::new();
    let mut historical_yield = BTreeMap::new();
    for row in csv::Reader::from_reader(regions).deserialize::<RegionRecord>() {
        let row = row?;
        names.insert(row.region, row.name);
        historical_yield.insert(row.region, row.historical_yield);
    }

    let mut region_r: Vec<Option<u16>> = vec![None; n_cells];
    for row in csv::Reader::from_reader(cells).deserialize::<RegionCellRecord>() {
        let row = row?;
        let slot = region_r
            .get_mut(row.cell)
            .ok_or_else(|| DataError::Parse(format!("water regions: cell {} out of range", row.cell)))?;
        if slot.replace(row.region).is_some() {
            return Err(DataError::Parse(format!("water regions: cell {} assigned twice", row.cell)));
        }
    }
    let region_r = region_r
        .into_iter()
        .enumerate()
        .map(|(r, id)| id.ok_or_else(|| DataError::Parse(format!("water regions: cell {r} unassigned"))))
        .collect::<DataResult<Vec<u16>>>()?;

    Ok(WaterRegions { region_r, names, historical_yield })
}

// ── GHG limits ────────────────────────────────────────────────────────────────

/// Load the GHG limits table: a `YEAR` column and one column per scenario.
pub fn load_ghg_limits_csv(path: &Path) -> DataResult<GhgLimitTable> {
    load_ghg_limits_reader(File::open(path)?)
}

pub fn load_ghg_limits_reader<R: Read>(reader: R) -> DataResult<GhgLimitTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let year_col = headers
        .iter()
        .position(|h| h.trim() == "YEAR")
        .ok_or_else(|| DataError::Parse("GHG limits: no YEAR column".into()))?;
    let scenario_cols: Vec<(usize, &str)> =
        headers.iter().enumerate().filter(|&(c, _)| c != year_col).map(|(c, h)| (c, h.trim())).collect();

    let mut columns: Vec<BTreeMap<Year, f64>> = vec![BTreeMap::new(); scenario_cols.len()];
    for record in rdr.records() {
        let record = record?;
        let parse = |col: usize| record.get(col).map(str::trim).unwrap_or_default();
        let year = parse(year_col)
            .parse::<Year>()
            .map_err(|e| DataError::Parse(format!("GHG limits: bad year: {e}")))?;
        for (&(col, name), limits) in scenario_cols.iter().zip(columns.iter_mut()) {
            let value = parse(col)
                .parse::<f64>()
                .map_err(|e| DataError::Parse(format!("GHG limits: bad {name:?} value for {year}: {e}")))?;
            limits.insert(year, value);
        }
    }

    let mut table = GhgLimitTable::default();
    for ((_, name), limits) in scenario_cols.into_iter().zip(columns) {
        table.insert(name, limits);
    }
    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn complete_contribution(
    c:          Vec<Option<f64>>,
    taxonomy:   &LandUseTaxonomy,
    percentile: Option<u8>,
) -> DataResult<Vec<f64>> {
    c.into_iter()
        .enumerate()
        .map(|(j, v)| {
            v.ok_or_else(|| {
                let at = percentile.map(|p| format!(" at percentile {p}")).unwrap_or_default();
                DataError::Parse(format!("habitat contribution missing for {:?}{at}", taxonomy.ag_names()[j]))
            })
        })
        .collect()
}

fn category_index(names: &[String]) -> FxHashMap<&str, usize> {
    names.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect()
}
