//! Unstable scenario: c2 past the Hopf point, sustained bounded
//! oscillation. Persists the sampled trajectory as tab-separated text
//! alongside the rendered plot.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use stockdyn_cli::{init_tracing, output, plot};
use stockdyn_core::integrate::{integrate, SolverKind};
use stockdyn_core::model::{MarketParams, SharePriceModel};
use stockdyn_core::sweep::linspace;
use tracing::info;

const T_END: f64 = 20_000.0;
const SAMPLES: usize = 20_000;
const DT: f64 = 1.0;
const INITIAL_STATE: [f64; 3] = [0.54, 3.3, 0.75];

fn main() -> Result<()> {
    init_tracing();

    let params = MarketParams::unstable_market();
    let model = SharePriceModel::new(params);
    let sample_times = linspace(0.0, T_END, SAMPLES);
    let trajectory = integrate(
        &model,
        SolverKind::Tsit5,
        &INITIAL_STATE,
        0.0,
        &sample_times,
        DT,
    )
    .context("unstable scenario integration failed")?;

    let out_dir = Path::new("target/plots");
    fs::create_dir_all(out_dir)?;

    // 12x7 inches at 300 dpi.
    let png = out_dir.join("unstable_oscillation.png");
    plot::time_series_png(
        &png,
        &format!("Market dynamics, unstable oscillation (c2 = {})", params.c2),
        &trajectory,
        (3600, 2100),
    )?;
    info!(path = %png.display(), "saved time-series plot");

    let tsv = out_dir.join("unstable_oscillation.tsv");
    output::write_trajectory_tsv(&tsv, &trajectory)?;
    info!(path = %tsv.display(), rows = trajectory.len(), "saved trajectory table");

    Ok(())
}
