//! synthetic: end-to-end run over a randomly generated landscape.
//!
//! Builds a few hundred cells with the four-use fixture taxonomy, then lets
//! a greedy optimizer replant the cells that gain the most habitat value
//! each year.  Output lands in `./output` (or the first argument); a
//! settings TOML may be given as the second argument.
//!
//! ```text
//! RUST_LOG=info cargo run -p synthetic -- ./output settings.toml
//! ```

mod domain;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use lu_core::{LandUse, Settings};
use lu_output::{CsvWriter, SimOutputObserver};
use lu_sim::{Allocation, Optimizer, SimBuilder, SimResult, YearInputs};

// ── Constants ─────────────────────────────────────────────────────────────────

const CELL_COUNT:     usize = 400;
const SEED:           u64   = 42;
const PLANT_PER_YEAR: usize = 20;

// ── Optimizer ─────────────────────────────────────────────────────────────────

/// Replants the agricultural cells with the largest habitat gain from
/// Environmental Plantings and keeps everything else.
struct GreedyPlanting {
    per_year: usize,
}

impl Optimizer for GreedyPlanting {
    fn solve(&self, inputs: &YearInputs<'_>) -> SimResult<Allocation> {
        let data = inputs.data;
        let bio = &inputs.biodiversity;
        let mut alloc = Allocation::hold(inputs.current, data.n_ag(), data.n_non_ag())?;

        let mut gains: Vec<(usize, f64)> = (0..inputs.n_cells())
            .filter_map(|r| {
                let (m, j) = inputs.current.current_ag(r)?;
                let gain = bio.non_ag_b_rk[[r, 0]] - bio.b_mrj[[m.index(), r, j.index()]];
                (gain > 0.0).then_some((r, gain))
            })
            .collect();
        gains.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        for &(r, _) in gains.iter().take(self.per_year) {
            alloc.ag_mrj.slice_mut(ndarray::s![.., r, ..]).fill(0.0);
            alloc.non_ag_rk[[r, 0]] = 1.0;
        }
        Ok(alloc)
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("output"));
    let settings = match args.next() {
        Some(path) => Settings::from_path(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };

    println!("=== synthetic: land-use transition run ===");
    println!("Cells: {CELL_COUNT}  |  Seed: {SEED}  |  Solve years: {}", settings.sim_years.len().saturating_sub(1));

    // 1. Landscape.
    let (data, base_maps) = domain::build_domain(CELL_COUNT, SEED)?;
    println!(
        "Domain: {} cells, {:.0} ha, {} agricultural / {} non-agricultural uses",
        data.n_cells(),
        data.real_area.sum(),
        data.n_ag(),
        data.n_non_ag()
    );

    // 2. Simulation.
    let mut sim = SimBuilder::new(settings, data, base_maps, GreedyPlanting { per_year: PLANT_PER_YEAR })
        .cost_breakdown(true)
        .build()
        .context("building simulation")?;

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let mut observer = SimOutputObserver::new(CsvWriter::new(&out_dir)?);

    // 3. Run.
    sim.run(&mut observer).context("running simulation")?;
    if let Some(e) = observer.take_error() {
        bail!("output error: {e}");
    }

    // 4. Summary.
    let (base_year, base) = sim.history.base();
    let (final_year, last) = sim.history.latest();
    let planted = last.lumap().iter().filter(|lu| matches!(lu, LandUse::NonAg(_))).count();
    let changed = (0..last.n_cells()).filter(|&r| base.land_use(r) != last.land_use(r)).count();
    println!();
    println!("{base_year} → {final_year}: {changed} cells changed use, {planted} under non-agricultural use");
    println!("Wrote {} years to {}", observer.years_written(), out_dir.display());
    Ok(())
}
