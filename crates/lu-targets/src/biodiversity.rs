//! Biodiversity limits.
//!
//! Every framework resolves to a per-category floor on the in-study-area
//! score (`limit_v`), plus the outside-study-area and all-Australia scores
//! that turn an in-study-area score into a percentage:
//!
//! ```text
//! pct_v = (inside_v + outside_v) / all_v · 100
//! ```
//!
//! # Score frameworks (GBF3, GBF4, GBF8)
//!
//! The base-year percentage, scored from the base-year map, is added as an
//! anchor to each category's target timeline.  Then
//!
//! ```text
//! limit_v(yr) = max(0, pct_v(yr) / 100 · all_v(yr) − outside_v(yr))
//! ```
//!
//! A category without targets therefore holds its base-year percentage.
//!
//! # Priority degraded areas (GBF2)
//!
//! `limit = base + p(yr) · (max − base)` where `base` is the score of the
//! base-year map over the selected cells, `max` the score at full habitat
//! and `p` the restoration share timeline with an anchor of 0 at the base
//! year.  `outside = 0` and `all = max`.

use ndarray::Array1;

use lu_biodiversity::{FrameworkLayers, HabitatContributions, cell_value_r, framework_layers};
use lu_core::{BiodiversityFramework, LandUseHistory, Settings, TargetTimeline, Year};
use lu_data::DomainData;

use crate::{TargetError, TargetResult};

/// One framework's limits for one year.  Empty when the framework is disabled.
#[derive(Clone, Debug)]
pub struct FrameworkLimits {
    pub framework:  BiodiversityFramework,
    pub year:       Year,
    pub names:      Vec<String>,
    /// Minimum in-study-area score per category.
    pub limit_v:    Array1<f64>,
    pub outside_v:  Array1<f64>,
    pub all_v:      Array1<f64>,
    /// Base-year percentage per category.
    pub base_pct_v: Array1<f64>,
}

impl FrameworkLimits {
    pub fn empty(framework: BiodiversityFramework, year: Year) -> Self {
        Self {
            framework,
            year,
            names: Vec::new(),
            limit_v: Array1::zeros(0),
            outside_v: Array1::zeros(0),
            all_v: Array1::zeros(0),
            base_pct_v: Array1::zeros(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Percentage of the all-Australia score reached by `inside_v`.
    pub fn percentage(&self, inside_v: &Array1<f64>) -> Array1<f64> {
        let mut pct = Array1::zeros(self.names.len());
        for v in 0..self.names.len() {
            pct[v] = to_pct(inside_v[v], self.outside_v[v], self.all_v[v]);
        }
        pct
    }

    /// Target percentage per category.
    pub fn target_pct_v(&self) -> Array1<f64> {
        self.percentage(&self.limit_v)
    }

    /// `(name, limit)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names.iter().map(String::as_str).zip(self.limit_v.iter().copied())
    }
}

fn to_pct(inside: f64, outside: f64, all: f64) -> f64 {
    if all > 0.0 { (inside + outside) / all * 100.0 } else { 0.0 }
}

/// Limits of every framework for `year`, in [`BiodiversityFramework::ALL`]
/// order.
pub fn biodiversity_limits(
    data:     &DomainData,
    settings: &Settings,
    history:  &LandUseHistory,
    year:     Year,
) -> TargetResult<Vec<FrameworkLimits>> {
    let contributions = HabitatContributions::new(data, settings)?;
    let value_r = cell_value_r(data, settings)?;
    BiodiversityFramework::ALL
        .iter()
        .map(|&fw| framework_limits(data, settings, history, &contributions, &value_r, fw, year))
        .collect()
}

/// Limits of one framework for `year`.
pub fn framework_limits(
    data:          &DomainData,
    settings:      &Settings,
    history:       &LandUseHistory,
    contributions: &HabitatContributions,
    value_r:       &Array1<f64>,
    framework:     BiodiversityFramework,
    year:          Year,
) -> TargetResult<FrameworkLimits> {
    if !settings.biodiversity.is_enabled(framework) {
        return Ok(FrameworkLimits::empty(framework, year));
    }
    let (base_year, base_maps) = history.base();
    let base_fraction_r = contributions.fractions_for(base_maps)?;
    let layers_at = |yr: Year| -> TargetResult<FrameworkLayers> {
        Ok(framework_layers(data, settings, contributions, value_r, base_maps, framework, yr)?)
    };

    let limits = if framework == BiodiversityFramework::Gbf2 {
        let layers = layers_at(year)?;
        let base = layers.scores(&base_fraction_r);
        let max = layers.max_scores();
        let p = settings
            .biodiversity
            .gbf2
            .targets
            .with_anchor(base_year, 0.0)
            .value_at(year)
            .unwrap_or(0.0);
        let limit_v = &base + &((&max - &base) * p);
        let zeros = Array1::zeros(layers.n_categories());
        let base_pct_v = base.iter().zip(&max).map(|(&b, &m)| to_pct(b, 0.0, m)).collect();
        FrameworkLimits {
            framework,
            year,
            names: layers.names,
            limit_v,
            outside_v: zeros,
            all_v: max,
            base_pct_v,
        }
    } else {
        score_framework_limits(data, framework, year, base_year, &base_fraction_r, layers_at(base_year)?)?
    };

    tracing::debug!(framework = framework.name(), %year, categories = limits.names.len(), "biodiversity limits resolved");
    Ok(limits)
}

fn score_framework_limits(
    data:            &DomainData,
    framework:       BiodiversityFramework,
    year:            Year,
    base_year:       Year,
    base_fraction_r: &Array1<f64>,
    base_layers:     FrameworkLayers,
) -> TargetResult<FrameworkLimits> {
    let missing = |yr: Year| TargetError::MissingFrameworkYear { framework: framework.name(), year: yr };
    let fw = data
        .framework(framework)
        .ok_or(lu_biodiversity::BiodiversityError::MissingFramework(framework.name()))?;

    let outside_base = fw.outside_baseline.at(base_year).ok_or_else(|| missing(base_year))?;
    let all_base = fw.all_australia_baseline.at(base_year).ok_or_else(|| missing(base_year))?;
    let outside_v = fw.outside_baseline.at(year).ok_or_else(|| missing(year))?;
    let all_v = fw.all_australia_baseline.at(year).ok_or_else(|| missing(year))?;

    let inside_base = base_layers.scores(base_fraction_r);
    let n = fw.n_categories();
    let mut base_pct_v = Array1::zeros(n);
    let mut limit_v = Array1::zeros(n);
    for v in 0..n {
        base_pct_v[v] = to_pct(inside_base[v], outside_base[v], all_base[v]);
        let timeline: TargetTimeline = fw.targets[v].with_anchor(base_year, base_pct_v[v]);
        let pct = timeline.value_at(year).unwrap_or(base_pct_v[v]);
        limit_v[v] = (pct / 100.0 * all_v[v] - outside_v[v]).max(0.0);
    }

    Ok(FrameworkLimits { framework, year, names: fw.names.clone(), limit_v, outside_v, all_v, base_pct_v })
}
