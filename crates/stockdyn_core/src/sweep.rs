//! Bifurcation sweep over the conversion rate c2.
//!
//! Each parameter value is integrated from the *previous* value's final
//! state (numerical continuation), so equilibrium branches are tracked
//! smoothly instead of re-settling from a fixed initial condition. The
//! chain makes the sweep inherently sequential: values must be visited in
//! ascending order.

use crate::classify::{classify_window, Classification, WindowSummary};
use crate::integrate::{integrate, SolverKind};
use crate::model::{MarketParams, SharePriceModel};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sweep controls. The default reproduces the published study: integrate
/// to t = 8000 and classify only the settled window [6000, 8000], leaving
/// the transient out of the diagram.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepSettings {
    /// End of the integration span (starts at t = 0).
    pub t_end: f64,
    /// Start of the late sampling window.
    pub window_start: f64,
    /// Number of samples across the window.
    pub window_samples: usize,
    /// Integrator step size.
    pub dt: f64,
    pub solver: SolverKind,
    /// A final driver value below this means the driver went extinct and
    /// the parameter value is excluded from the diagram.
    pub extinction_threshold: f64,
    /// Decimal places extrema are rounded to before deduplication.
    pub round_digits: u32,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            t_end: 8000.0,
            window_start: 6000.0,
            window_samples: 1000,
            dt: 0.5,
            solver: SolverKind::Tsit5,
            extinction_threshold: 1e-4,
            round_digits: 4,
        }
    }
}

/// One point of the bifurcation diagram: an extremum (or settled value) of
/// X1 observed at a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BifurcationRecord {
    pub c2: f64,
    pub value: f64,
    pub classification: Classification,
}

/// Result of one sweep step: the records it contributes and the final
/// state to seed the next step with.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub records: Vec<BifurcationRecord>,
    pub final_state: Vec<f64>,
    /// True when the driver went extinct and the step emitted no records.
    pub discarded: bool,
}

/// Accumulated output of a full sweep.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub records: Vec<BifurcationRecord>,
    /// Continuation state after the last step.
    pub final_state: Vec<f64>,
    pub discarded_steps: usize,
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn validate_settings(settings: &SweepSettings) -> Result<()> {
    if !(settings.t_end > settings.window_start && settings.window_start >= 0.0) {
        bail!("Sampling window must lie inside the integration span.");
    }
    if settings.window_samples < 2 {
        bail!("Sampling window needs at least two samples.");
    }
    if !(settings.dt.is_finite() && settings.dt > 0.0) {
        bail!("Step size dt must be positive.");
    }
    if settings.extinction_threshold <= 0.0 {
        bail!("Extinction threshold must be positive.");
    }
    Ok(())
}

/// Integrates one parameter value from the carried state and reduces the
/// settled window to bifurcation records.
pub fn sweep_step(
    params: &MarketParams,
    c2: f64,
    continuation: &[f64],
    settings: &SweepSettings,
) -> Result<StepOutcome> {
    validate_settings(settings)?;
    let model = SharePriceModel::new(params.with_conversion_rate(c2));
    let sample_times = linspace(settings.window_start, settings.t_end, settings.window_samples);
    let trajectory = integrate(
        &model,
        settings.solver,
        continuation,
        0.0,
        &sample_times,
        settings.dt,
    )
    .with_context(|| format!("integration failed at c2 = {c2}"))?;

    let final_state = trajectory
        .final_state()
        .context("sampled trajectory is empty")?
        .to_vec();

    if final_state[2] < settings.extinction_threshold {
        return Ok(StepOutcome {
            records: Vec::new(),
            final_state,
            discarded: true,
        });
    }

    let x1 = trajectory.component(0);
    let records = match classify_window(&x1, settings.round_digits)? {
        WindowSummary::Stable { final_value } => vec![BifurcationRecord {
            c2,
            value: final_value,
            classification: Classification::Stable,
        }],
        WindowSummary::Oscillatory { maxima, minima } => maxima
            .into_iter()
            .chain(minima)
            .map(|value| BifurcationRecord {
                c2,
                value,
                classification: Classification::Oscillatory,
            })
            .collect(),
    };

    Ok(StepOutcome {
        records,
        final_state,
        discarded: false,
    })
}

/// Sweeps c2 across `c2_values` (ascending), threading the continuation
/// state through every step.
///
/// The continuation state advances unconditionally, including on steps the
/// extinction check discards: a discarded value contributes no records but
/// its final state still seeds the next step.
pub fn sweep_conversion_rate(
    params: &MarketParams,
    c2_values: &[f64],
    initial_state: &[f64],
    settings: &SweepSettings,
) -> Result<SweepResult> {
    if c2_values.is_empty() {
        bail!("Sweep needs at least one parameter value.");
    }
    if c2_values.windows(2).any(|w| w[1] < w[0]) {
        bail!("Sweep values must be in ascending order; continuation depends on it.");
    }
    if initial_state.len() != 3 {
        bail!(
            "Initial state must have dimension 3, got {}.",
            initial_state.len()
        );
    }
    validate_settings(settings)?;

    let mut continuation = initial_state.to_vec();
    let mut records = Vec::new();
    let mut discarded_steps = 0usize;

    for &c2 in c2_values {
        let step = sweep_step(params, c2, &continuation, settings)?;
        debug!(
            c2,
            emitted = step.records.len(),
            discarded = step.discarded,
            "sweep step complete"
        );
        if step.discarded {
            discarded_steps += 1;
        }
        records.extend(step.records);
        continuation = step.final_state;
    }

    Ok(SweepResult {
        records,
        final_state: continuation,
        discarded_steps,
    })
}
