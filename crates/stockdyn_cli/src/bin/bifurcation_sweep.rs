//! Conversion-rate sweep: 300 values of c2 across the Hopf point, each
//! integrated from the previous value's final state, reduced to a
//! bifurcation diagram.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use stockdyn_cli::{init_tracing, plot};
use stockdyn_core::equilibrium::{hopf_crossing, NewtonSettings};
use stockdyn_core::model::{MarketParams, SharePriceModel};
use stockdyn_core::sweep::{linspace, sweep_conversion_rate, SweepSettings};
use tracing::{info, warn};

const C2_START: f64 = 0.220;
const C2_END: f64 = 0.235;
const C2_STEPS: usize = 300;
const INITIAL_STATE: [f64; 3] = [0.54, 3.3, 0.75];

fn main() -> Result<()> {
    init_tracing();

    let params = MarketParams::sweep_baseline();
    let c2_values = linspace(C2_START, C2_END, C2_STEPS);
    let settings = SweepSettings::default();

    let result = sweep_conversion_rate(&params, &c2_values, &INITIAL_STATE, &settings)
        .context("conversion-rate sweep failed")?;
    info!(
        records = result.records.len(),
        discarded = result.discarded_steps,
        "sweep complete"
    );

    let hopf = match hopf_crossing(
        |c2| SharePriceModel::new(params.with_conversion_rate(c2)),
        C2_START,
        C2_END,
        &INITIAL_STATE,
        NewtonSettings::default(),
    ) {
        Ok(c2) => {
            info!(c2, "predicted Hopf point");
            Some(c2)
        }
        Err(err) => {
            warn!(?err, "Hopf prediction failed; plotting without marker");
            None
        }
    };

    let out_dir = Path::new("target/plots");
    fs::create_dir_all(out_dir)?;
    let png = out_dir.join("bifurcation_diagram.png");
    plot::bifurcation_scatter_png(
        &png,
        "Hopf bifurcation in the market model",
        &result.records,
        hopf,
        (1800, 1050),
    )?;
    info!(path = %png.display(), "saved bifurcation diagram");

    Ok(())
}
