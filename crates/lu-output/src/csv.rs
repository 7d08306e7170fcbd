//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `transition_costs.csv`
//! - `biodiversity_scores.csv`
//! - `limits.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BiodiversityScoreRow, LimitRow, OutputResult, TransitionCostRow};

pub const TRANSITION_COSTS_HEADER: [&str; 7] =
    ["year", "from_lm", "from_lu", "to_lm", "to_lu", "component", "cost"];
pub const BIODIVERSITY_SCORES_HEADER: [&str; 6] = ["year", "kind", "overlay", "land_use", "lm", "score"];
pub const LIMITS_HEADER: [&str; 8] =
    ["year", "kind", "group", "name", "limit", "achieved", "pct", "target_pct"];

/// Writes run output to three CSV files.
pub struct CsvWriter {
    costs:    Writer<File>,
    scores:   Writer<File>,
    limits:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut costs = Writer::from_path(dir.join("transition_costs.csv"))?;
        costs.write_record(TRANSITION_COSTS_HEADER)?;

        let mut scores = Writer::from_path(dir.join("biodiversity_scores.csv"))?;
        scores.write_record(BIODIVERSITY_SCORES_HEADER)?;

        let mut limits = Writer::from_path(dir.join("limits.csv"))?;
        limits.write_record(LIMITS_HEADER)?;

        Ok(Self { costs, scores, limits, finished: false })
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_transition_costs(&mut self, rows: &[TransitionCostRow]) -> OutputResult<()> {
        for row in rows {
            self.costs.write_record(&[
                row.year.to_string(),
                row.from_lm.to_owned(),
                row.from_lu.clone(),
                row.to_lm.to_owned(),
                row.to_lu.clone(),
                row.component.to_owned(),
                row.cost.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_biodiversity_scores(&mut self, rows: &[BiodiversityScoreRow]) -> OutputResult<()> {
        for row in rows {
            self.scores.write_record(&[
                row.year.to_string(),
                row.kind.to_owned(),
                row.overlay.clone(),
                row.land_use.clone(),
                row.lm.to_owned(),
                row.score.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_limits(&mut self, rows: &[LimitRow]) -> OutputResult<()> {
        for row in rows {
            self.limits.write_record(&[
                row.year.to_string(),
                row.kind.to_owned(),
                row.group.clone(),
                row.name.clone(),
                row.limit.to_string(),
                opt(row.achieved),
                opt(row.pct),
                opt(row.target_pct),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.costs.flush()?;
        self.scores.flush()?;
        self.limits.flush()?;
        Ok(())
    }
}
