//! Stable-equilibrium scenario: all three prices settle onto a fixed point.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use stockdyn_cli::{init_tracing, plot};
use stockdyn_core::integrate::{integrate, SolverKind};
use stockdyn_core::model::{MarketParams, SharePriceModel};
use stockdyn_core::sweep::linspace;
use stockdyn_core::traits::DynamicalSystem;
use tracing::info;

const T_END: f64 = 20_000.0;
const SAMPLES: usize = 20_000;
const DT: f64 = 1.0;
const INITIAL_STATE: [f64; 3] = [0.54, 3.3, 0.75];

fn main() -> Result<()> {
    init_tracing();

    let params = MarketParams::stable_market();
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
    .context("stable scenario integration failed")?;

    let out_dir = Path::new("target/plots");
    fs::create_dir_all(out_dir)?;
    let png = out_dir.join("stable_equilibrium.png");
    plot::time_series_png(
        &png,
        &format!(
            "Stable equilibrium: b2 = {}, c1 = {}, c2 = {}",
            params.b2, params.c1, params.c2
        ),
        &trajectory,
        (1280, 720),
    )?;

    let fin = trajectory.final_state().context("trajectory is empty")?;
    let mut rates = [0.0_f64; 3];
    model.apply(T_END, fin, &mut rates);
    let rate_norm = rates.iter().map(|v| v * v).sum::<f64>().sqrt();
    info!(
        x1 = fin[0],
        x2 = fin[1],
        y = fin[2],
        rate_norm,
        "final state"
    );
    info!(path = %png.display(), "saved time-series plot");
    Ok(())
}
